//! Page concatenation on top of lopdf.
//!
//! The first input becomes the base document. Every following input is
//! renumbered past the base's highest object id, its objects are moved over,
//! and its whole page tree is hung under the base's root `Pages` node as a
//! subtree. Keeping the subtree intact preserves attributes the pages inherit
//! from their original tree (`MediaBox`, `Resources`, `Rotate`).

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use super::{MergeOptions, PdfMerger};
use crate::config::CompressionLevel;
use crate::error::{JoinerError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in the joined document.
    pub total_pages: usize,

    /// Time spent loading inputs.
    pub load_time: Duration,

    /// Total time spent in the merge, writing included.
    pub merge_time: Duration,

    /// Total size of the inputs.
    pub input_size: u64,

    /// Size of the written output.
    pub output_size: u64,

    /// Compression applied to the output.
    pub compression: CompressionLevel,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// [`PdfMerger`] implementation backed by lopdf.
#[derive(Debug, Clone, Default)]
pub struct LopdfMerger {
    reader: PdfReader,
    writer: PdfWriter,
}

impl LopdfMerger {
    /// Create a merger with default reader and writer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine loaded documents into one, in order.
    pub fn merge_documents(
        &self,
        loaded_pdfs: Vec<LoadedPdf>,
        compression: CompressionLevel,
    ) -> Result<Document> {
        let mut documents = loaded_pdfs.into_iter().map(|loaded| loaded.document);

        let Some(mut merged) = documents.next() else {
            return Err(JoinerError::merge_failed("no documents to merge"));
        };

        let root_pages = root_pages_id(&merged)?;
        let mut max_id = merged.max_id;

        for mut doc in documents {
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let subtree = root_pages_id(&doc)?;
            let page_count = doc.get_pages().len();

            // the input's catalog would only be an unreferenced leftover
            let catalog = doc
                .trailer
                .get(b"Root")
                .and_then(Object::as_reference)
                .map_err(|e| JoinerError::merge_failed(format!("input has no catalog: {e}")))?;
            doc.objects.remove(&catalog);

            doc.get_object_mut(subtree)
                .and_then(Object::as_dict_mut)
                .map_err(|e| JoinerError::merge_failed(format!("invalid page tree: {e}")))?
                .set("Parent", Object::Reference(root_pages));

            merged.objects.extend(doc.objects);
            attach_subtree(&mut merged, root_pages, subtree, page_count)?;
        }

        merged.max_id = max_id;

        match compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => merged.compress(),
            CompressionLevel::Maximum => {
                merged.prune_objects();
                merged.compress();
            }
        }

        merged.renumber_objects();

        Ok(merged)
    }
}

impl PdfMerger for LopdfMerger {
    fn merge(
        &self,
        inputs: &[PathBuf],
        destination: &Path,
        options: &MergeOptions,
    ) -> Result<MergeStatistics> {
        let merge_start = Instant::now();

        let (loaded, load_stats) = self.reader.load_all(inputs)?;
        let files_merged = loaded.len();

        let mut document = self.merge_documents(loaded, options.compression)?;
        let total_pages = document.get_pages().len();

        let write_stats = self.writer.save_with_stats(&mut document, destination)?;

        debug!(
            files = files_merged,
            pages = total_pages,
            size = %write_stats.format_file_size(),
            "wrote joined PDF"
        );

        Ok(MergeStatistics {
            files_merged,
            total_pages,
            load_time: load_stats.total_time,
            merge_time: merge_start.elapsed(),
            input_size: load_stats.total_size,
            output_size: write_stats.file_size,
            compression: options.compression,
        })
    }
}

fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| JoinerError::merge_failed(format!("Failed to get pages reference: {e}")))
}

fn attach_subtree(
    merged: &mut Document,
    root_pages: ObjectId,
    subtree: ObjectId,
    page_count: usize,
) -> Result<()> {
    // Kids may live in its own indirect object
    let indirect_kids = match pages_dict(merged, root_pages)?.get(b"Kids") {
        Ok(Object::Array(_)) => None,
        Ok(Object::Reference(id)) => Some(*id),
        Ok(_) => return Err(JoinerError::merge_failed("Kids is not an array")),
        Err(_) => return Err(JoinerError::merge_failed("Pages dictionary missing Kids array")),
    };

    let kids = match indirect_kids {
        Some(id) => merged.get_object_mut(id),
        None => pages_dict(merged, root_pages)?.get_mut(b"Kids"),
    }
    .and_then(Object::as_array_mut)
    .map_err(|e| JoinerError::merge_failed(format!("Kids is not an array: {e}")))?;
    kids.push(Object::Reference(subtree));

    let dict = pages_dict(merged, root_pages)?;
    let current_count = dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + page_count as i64));

    Ok(())
}

fn pages_dict(merged: &mut Document, root_pages: ObjectId) -> Result<&mut Dictionary> {
    merged
        .get_dictionary_mut(root_pages)
        .map_err(|e| JoinerError::merge_failed(format!("Failed to get pages object: {e}")))
}

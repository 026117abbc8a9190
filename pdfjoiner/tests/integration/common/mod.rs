//! Shared helpers for the integration tests.
//!
//! PDFs are generated on the fly with lopdf. Each page's MediaBox width
//! identifies the document it came from, so page order can be checked after
//! a join.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfjoiner::MergeExecutor;
use pdfjoiner::convert::{ConversionDispatcher, DocumentConverter, DocumentType};
use pdfjoiner::error::Result;
use pdfjoiner::merge::LopdfMerger;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Build a document with `pages` pages, each `width` points wide.
pub fn build_pdf(pages: usize, width: i64) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (0..pages)
        .map(|n| {
            let text = format!("BT /F1 18 Tf 50 700 Td (Sheet {n}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(842),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a generated PDF into `dir`.
pub fn write_pdf(dir: &Path, name: &str, pages: usize, width: i64) -> PathBuf {
    let path = dir.join(name);
    build_pdf(pages, width)
        .save(&path)
        .expect("Failed to write test PDF");
    path
}

/// Write an arbitrary file into `dir`.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Page widths of a PDF on disk, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load joined PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(|object| object.as_array())
                .expect("page MediaBox");
            media_box[2].as_i64().expect("MediaBox width")
        })
        .collect()
}

/// Fresh scratch directory.
pub fn scratch() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Converter standing in for Office: writes a PDF whose pages are
/// `width` points wide, one page per conversion.
pub struct StubConverter {
    width: i64,
    pub converted: Mutex<Vec<PathBuf>>,
    pub targets: Mutex<Vec<PathBuf>>,
}

impl StubConverter {
    pub fn new(width: i64) -> Self {
        Self {
            width,
            converted: Mutex::new(Vec::new()),
            targets: Mutex::new(Vec::new()),
        }
    }
}

impl DocumentConverter for StubConverter {
    fn convert(&self, source: &Path, _kind: DocumentType, target: &Path) -> Result<()> {
        self.converted.lock().unwrap().push(source.to_path_buf());
        self.targets.lock().unwrap().push(target.to_path_buf());
        build_pdf(1, self.width).save(target)?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Executor with a stub converter and the lopdf merge engine.
pub fn executor_with(converter: Arc<StubConverter>, temp_dir: &Path) -> MergeExecutor {
    let dispatcher = ConversionDispatcher::new(converter).with_temp_dir(temp_dir);
    MergeExecutor::new(dispatcher, Arc::new(LopdfMerger::new()))
}

//! PDF loading.
//!
//! Loading is synchronous; callers on an async runtime run it inside
//! `spawn_blocking`.

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{JoinerError, Result};
use crate::utils::format_file_size;

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// Aggregate numbers for a batch of loads.
#[derive(Debug, Clone, Default)]
pub struct LoadStatistics {
    /// Number of PDFs loaded.
    pub files_loaded: usize,

    /// Total time spent loading.
    pub total_time: Duration,

    /// Total size of the loaded files.
    pub total_size: u64,

    /// Total number of pages loaded.
    pub total_pages: usize,
}

impl LoadStatistics {
    fn from_loaded(loaded: &[LoadedPdf], total_time: Duration) -> Self {
        Self {
            files_loaded: loaded.len(),
            total_time,
            total_size: loaded.iter().map(|l| l.file_size).sum(),
            total_pages: loaded.iter().map(|l| l.page_count).sum(),
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a reader that rejects documents without pages.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns [`JoinerError::MergeFailed`] naming the file if it is not a
    /// valid PDF, is encrypted, or (when verifying) has no pages.
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let start = Instant::now();

        let document = Document::load(path).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                JoinerError::merge_failed(format!("{} is encrypted", path.display()))
            } else {
                JoinerError::merge_failed(format!(
                    "{} is not a valid PDF: {err_msg}",
                    path.display()
                ))
            }
        })?;

        if document.is_encrypted() {
            return Err(JoinerError::merge_failed(format!(
                "{} is encrypted",
                path.display()
            )));
        }

        if self.verify && document.get_pages().is_empty() {
            return Err(JoinerError::merge_failed(format!(
                "{} has no pages",
                path.display()
            )));
        }

        let loaded = LoadedPdf::new(document, path.to_path_buf(), start.elapsed());
        debug!(
            path = %path.display(),
            pages = loaded.page_count,
            load_ms = loaded.load_time.as_millis() as u64,
            "loaded PDF"
        );

        Ok(loaded)
    }

    /// Load PDFs in order, stopping at the first failure.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<(Vec<LoadedPdf>, LoadStatistics)> {
        let start = Instant::now();

        let loaded = paths
            .iter()
            .map(|path| self.load(path))
            .collect::<Result<Vec<_>>>()?;

        let stats = LoadStatistics::from_loaded(&loaded, start.elapsed());
        Ok((loaded, stats))
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

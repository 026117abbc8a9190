//! PDF writing.
//!
//! Writes are atomic by default: the document is written to a temporary file
//! in the destination's directory and renamed into place once complete, so a
//! failed write never leaves a truncated destination behind.

use lopdf::Document;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{JoinerError, Result};
use crate::utils::format_file_size;

const TEMP_PREFIX: &str = ".pdfjoiner-";

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write to a temporary file, then rename.
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that writes straight to the destination.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Save a PDF document to `path`.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// # Errors
    ///
    /// Returns [`JoinerError::MergeFailed`] if the file cannot be created,
    /// written or renamed into place.
    pub fn save_with_stats(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        if self.options.atomic {
            self.write_atomic(doc, path)?;
        } else {
            let file = std::fs::File::create(path).map_err(|e| write_failed(path, e))?;
            self.write_to(doc, file, path)?;
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
        })
    }

    fn write_atomic(&self, doc: &mut Document, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".pdf.tmp")
            .tempfile_in(dir)
            .map_err(|e| write_failed(path, e))?;

        self.write_to(doc, temp.as_file_mut(), path)?;

        // the temp file is deleted on drop if persisting fails
        temp.persist(path).map_err(|e| write_failed(path, e.error))?;
        Ok(())
    }

    fn write_to<W: Write>(&self, doc: &mut Document, target: W, path: &Path) -> Result<()> {
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, target);

        doc.save_to(&mut writer)
            .map_err(|e| write_failed(path, std::io::Error::other(e)))?;
        writer.flush().map_err(|e| write_failed(path, e))?;

        Ok(())
    }
}

fn write_failed(path: &Path, err: std::io::Error) -> JoinerError {
    JoinerError::merge_failed(format!("cannot write {}: {err}", path.display()))
}

//! Pre-flight checks for a join run.
//!
//! Validation never writes the destination. The checks run in a fixed order:
//! 1. the destination's parent directory accepts new files
//! 2. the source list is not empty
//! 3. every source exists, is a regular file, can be opened for reading and
//!    is either a PDF or a type the converter handles
//!
//! The first failing check aborts validation.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoiner::list::SourceFile;
//! use pdfjoiner::validation::Validator;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new();
//! let sources = [SourceFile::new("a.pdf"), SourceFile::new("slides.pptx")];
//! let summary = validator.validate(Path::new("out/joined.pdf"), &sources)?;
//! println!("{} files, {} to convert", summary.sources.len(), summary.conversions_needed);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::OverwriteMode;
use crate::convert::DocumentType;
use crate::error::{JoinerError, Result};
use crate::list::SourceFile;
use crate::utils::format_file_size;

const PROBE_PREFIX: &str = ".pdfjoiner-probe-";

/// Facts about a source that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCheck {
    /// Path to the source.
    pub path: PathBuf,

    /// Type declared by the file name.
    pub document_type: DocumentType,

    /// Size of the file in bytes.
    pub file_size: u64,
}

impl SourceCheck {
    /// Whether the source must be converted before merging.
    pub fn needs_conversion(&self) -> bool {
        !self.document_type.is_pdf()
    }
}

/// Summary of a successful validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Checked sources in join order.
    pub sources: Vec<SourceCheck>,

    /// Sum of all source sizes in bytes.
    pub total_size: u64,

    /// Number of sources that are not PDFs.
    pub conversions_needed: usize,
}

impl ValidationSummary {
    fn from_checks(sources: Vec<SourceCheck>) -> Self {
        let total_size = sources.iter().map(|s| s.file_size).sum();
        let conversions_needed = sources.iter().filter(|s| s.needs_conversion()).count();

        Self {
            sources,
            total_size,
            conversions_needed,
        }
    }

    /// Format the total size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Runs the pre-flight checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Run every check for a join into `destination`.
    ///
    /// # Errors
    ///
    /// Returns the first failure among [`JoinerError::DestinationUnwritable`],
    /// [`JoinerError::EmptySourceList`], [`JoinerError::SourceUnreadable`] and
    /// [`JoinerError::ConversionUnsupported`].
    pub fn validate(&self, destination: &Path, sources: &[SourceFile]) -> Result<ValidationSummary> {
        self.check_destination(destination)?;
        self.check_sources(sources)
    }

    /// Check that a file can be created at `destination`.
    ///
    /// A destination without a parent component refers to the current
    /// directory. The check creates and removes a probe file in the parent so
    /// that permission and read-only mount problems surface here rather than
    /// after conversion.
    pub fn check_destination(&self, destination: &Path) -> Result<()> {
        if destination.as_os_str().is_empty() {
            return Err(JoinerError::destination_unwritable(
                destination,
                "no destination selected",
            ));
        }

        if destination.is_dir() {
            return Err(JoinerError::destination_unwritable(
                destination,
                "destination is a directory",
            ));
        }

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let metadata = std::fs::metadata(parent).map_err(|e| {
            JoinerError::destination_unwritable(
                destination,
                format!("directory {} is not accessible: {e}", parent.display()),
            )
        })?;

        if !metadata.is_dir() {
            return Err(JoinerError::destination_unwritable(
                destination,
                format!("{} is not a directory", parent.display()),
            ));
        }

        tempfile::Builder::new()
            .prefix(PROBE_PREFIX)
            .tempfile_in(parent)
            .map_err(|e| {
                JoinerError::destination_unwritable(
                    destination,
                    format!("cannot create files in {}: {e}", parent.display()),
                )
            })?;

        Ok(())
    }

    /// Check that a single source can be read and turned into PDF pages.
    pub fn check_source(&self, source: &SourceFile) -> Result<SourceCheck> {
        let path = source.path();

        let metadata = std::fs::metadata(path).map_err(|e| {
            let reason = match e.kind() {
                std::io::ErrorKind::NotFound => "file does not exist".to_string(),
                _ => e.to_string(),
            };
            JoinerError::source_unreadable(path, reason)
        })?;

        if !metadata.is_file() {
            return Err(JoinerError::source_unreadable(path, "not a regular file"));
        }

        File::open(path).map_err(|e| JoinerError::source_unreadable(path, e.to_string()))?;

        let document_type = source.document_type();
        if !document_type.is_pdf() && !document_type.is_convertible() {
            return Err(JoinerError::ConversionUnsupported {
                kind: document_type,
            });
        }

        Ok(SourceCheck {
            path: path.to_path_buf(),
            document_type,
            file_size: metadata.len(),
        })
    }

    /// Check that the list is non-empty and that every source can be read.
    pub fn check_sources(&self, sources: &[SourceFile]) -> Result<ValidationSummary> {
        if sources.is_empty() {
            return Err(JoinerError::EmptySourceList);
        }

        let checks = sources
            .iter()
            .map(|source| self.check_source(source))
            .collect::<Result<Vec<_>>>()?;

        Ok(ValidationSummary::from_checks(checks))
    }

    /// Apply the overwrite policy to an existing destination.
    ///
    /// Returns `true` if the destination exists and the caller must ask the
    /// user before replacing it.
    pub fn check_overwrite(&self, destination: &Path, mode: OverwriteMode) -> Result<bool> {
        if !destination.exists() {
            return Ok(false);
        }

        match mode {
            OverwriteMode::NoClobber => Err(JoinerError::OutputExists {
                path: destination.to_path_buf(),
            }),
            OverwriteMode::Prompt => Ok(true),
            OverwriteMode::Force => Ok(false),
        }
    }
}

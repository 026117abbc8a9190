//! Error types for pdfjoiner.
//!
//! Every failure of a join run is reported through [`JoinerError`]. Errors are
//! surfaced once to the caller with a descriptive message and are never
//! retried.
//!
//! # Error Categories
//!
//! - **Validation**: unwritable destination, empty source list, unreadable source
//! - **Conversion**: unsupported document type, failed Office conversion
//! - **Merge**: the PDF engine rejected an input or could not write the output
//! - **Run control**: a run is already active, or the run was cancelled

use std::io;
use std::path::PathBuf;

use crate::convert::DocumentType;

/// Result type alias for pdfjoiner operations.
pub type Result<T> = std::result::Result<T, JoinerError>;

/// Main error type for pdfjoiner operations.
#[derive(Debug, thiserror::Error)]
pub enum JoinerError {
    /// The destination's parent directory is missing or cannot be written.
    #[error("Destination is not writable: {}\n  Reason: {reason}", .path.display())]
    DestinationUnwritable {
        /// Destination path requested by the caller.
        path: PathBuf,
        /// Why the destination was rejected.
        reason: String,
    },

    /// The run was started with no source files.
    #[error("No source files selected for joining")]
    EmptySourceList,

    /// A source file does not exist or cannot be opened for reading.
    #[error("Source file cannot be read: {}\n  Reason: {reason}", .path.display())]
    SourceUnreadable {
        /// Path of the offending source.
        path: PathBuf,
        /// Why the source was rejected.
        reason: String,
    },

    /// The source's document type has no converter.
    #[error("Conversion to PDF is not supported for {kind} documents")]
    ConversionUnsupported {
        /// Detected document type.
        kind: DocumentType,
    },

    /// The external converter failed for a source.
    #[error("Failed to convert to PDF: {}\n  Reason: {reason}", .path.display())]
    ConversionFailed {
        /// Path of the source that failed to convert.
        path: PathBuf,
        /// Details reported by the converter.
        reason: String,
    },

    /// The PDF engine failed to concatenate the sources.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Another join run is already active on this executor.
    #[error("A join is already in progress")]
    MergeInProgress,

    /// The run was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Failed to read an input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The merged PDF could not be opened in a viewer.
    #[error("Cannot open the joined PDF: {reason}")]
    ViewerUnavailable {
        /// Details about the failure.
        reason: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl JoinerError {
    /// Create a DestinationUnwritable error.
    pub fn destination_unwritable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DestinationUnwritable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SourceUnreadable error.
    pub fn source_unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConversionFailed error.
    pub fn conversion_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConversionFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a ViewerUnavailable error.
    pub fn viewer_unavailable(reason: impl Into<String>) -> Self {
        Self::ViewerUnavailable {
            reason: reason.into(),
        }
    }

    /// True for failures detected before any conversion or merge work started.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::DestinationUnwritable { .. }
                | Self::EmptySourceList
                | Self::SourceUnreadable { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptySourceList => 1,
            Self::InvalidConfig { .. } => 1,
            Self::SourceUnreadable { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::ConversionUnsupported { .. } => 3,
            Self::ConversionFailed { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::DestinationUnwritable { .. } => 5,
            Self::Io(_) => 5,
            Self::MergeFailed { .. } => 6,
            Self::MergeInProgress => 7,
            Self::ViewerUnavailable { .. } => 8,
            Self::Cancelled => 130,
        }
    }
}

impl From<lopdf::Error> for JoinerError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

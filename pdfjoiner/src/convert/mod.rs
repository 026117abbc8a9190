//! Document type detection and conversion to PDF.
//!
//! Sources that are not PDFs are converted into temporary PDFs before they are
//! handed to the merge engine. Detection looks at the filename suffix only; the
//! file contents are never sniffed.
//!
//! The converter itself is a capability injected through the
//! [`DocumentConverter`] trait. The production implementation,
//! [`OfficeConverter`], drives a local Microsoft Office installation and only
//! works on Windows.

pub mod dispatcher;
pub mod office;

pub use dispatcher::ConversionDispatcher;
pub use office::OfficeConverter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use crate::error::{JoinerError, Result};

/// Declared type of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Portable Document Format.
    Pdf,
    /// PowerPoint (Office Open XML).
    Pptx,
    /// PowerPoint 97-2003.
    Ppt,
    /// Word (Office Open XML).
    Docx,
    /// Word 97-2003.
    Doc,
    /// OpenDocument presentation.
    Odp,
    /// OpenDocument text.
    Odt,
    /// Anything else.
    Unknown,
}

impl DocumentType {
    /// Detect the document type from a path's file name.
    ///
    /// The comparison is case-insensitive and only the final suffix counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfjoiner::convert::DocumentType;
    ///
    /// assert_eq!(DocumentType::from_path("report.PPTX"), DocumentType::Pptx);
    /// assert_eq!(DocumentType::from_path("notes.txt"), DocumentType::Unknown);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Map a bare extension (without the dot) to a document type.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "pptx" => Self::Pptx,
            "ppt" => Self::Ppt,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "odp" => Self::Odp,
            "odt" => Self::Odt,
            _ => Self::Unknown,
        }
    }

    /// Canonical lowercase extension, if the type has one.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::Pdf => Some("pdf"),
            Self::Pptx => Some("pptx"),
            Self::Ppt => Some("ppt"),
            Self::Docx => Some("docx"),
            Self::Doc => Some("doc"),
            Self::Odp => Some("odp"),
            Self::Odt => Some("odt"),
            Self::Unknown => None,
        }
    }

    /// Whether the file can be merged without conversion.
    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// Whether the type is handled by Microsoft Word.
    pub fn is_word(&self) -> bool {
        matches!(self, Self::Docx | Self::Doc)
    }

    /// Whether the type is handled by Microsoft PowerPoint.
    pub fn is_presentation(&self) -> bool {
        matches!(self, Self::Pptx | Self::Ppt)
    }

    /// Whether a converter exists for this type.
    pub fn is_convertible(&self) -> bool {
        self.is_word() || self.is_presentation()
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extension() {
            Some(ext) => write!(f, "{}", ext.to_ascii_uppercase()),
            None => write!(f, "unknown"),
        }
    }
}

/// Capability that turns an Office document into a PDF file.
///
/// Implementations write the converted PDF to `target`, which the caller has
/// already created as an empty temporary file.
pub trait DocumentConverter: Send + Sync {
    /// Convert `source` of type `kind` into a PDF at `target`.
    fn convert(&self, source: &Path, kind: DocumentType, target: &Path) -> Result<()>;

    /// Whether the converter can run on this host at all.
    fn is_available(&self) -> bool;
}

/// A temporary PDF produced by a conversion.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct ConvertedPdf {
    source: PathBuf,
    temp: TempPath,
}

impl ConvertedPdf {
    pub(crate) fn new(source: PathBuf, temp: TempPath) -> Self {
        Self { source, temp }
    }

    /// Path of the temporary PDF.
    pub fn path(&self) -> &Path {
        &self.temp
    }

    /// Path of the document it was converted from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Result of a single conversion attempt.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Type detected from the source's name.
    pub source_type: DocumentType,
    result: Result<ConvertedPdf>,
}

impl ConversionOutcome {
    pub(crate) fn success(source_type: DocumentType, pdf: ConvertedPdf) -> Self {
        Self {
            source_type,
            result: Ok(pdf),
        }
    }

    pub(crate) fn failure(source_type: DocumentType, error: JoinerError) -> Self {
        Self {
            source_type,
            result: Err(error),
        }
    }

    /// Whether the conversion produced a PDF.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The temporary PDF, if the conversion succeeded.
    pub fn pdf(&self) -> Option<&ConvertedPdf> {
        self.result.as_ref().ok()
    }

    /// Consume the outcome, yielding the PDF or the failure.
    pub fn into_result(self) -> Result<ConvertedPdf> {
        self.result
    }
}

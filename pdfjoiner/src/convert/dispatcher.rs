//! Routes each source to the converter that handles its type.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{ConversionOutcome, ConvertedPdf, DocumentConverter, DocumentType};
use crate::error::JoinerError;
use crate::list::SourceFile;

/// Prefix for temporary PDFs created by conversions.
pub const TEMP_PREFIX: &str = "pdfjoiner_";

/// Detects source types and converts non-PDF sources into temporary PDFs.
#[derive(Clone)]
pub struct ConversionDispatcher {
    converter: Arc<dyn DocumentConverter>,
    temp_dir: Option<PathBuf>,
}

impl ConversionDispatcher {
    /// Create a dispatcher around a converter capability.
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            converter,
            temp_dir: None,
        }
    }

    /// Place temporary PDFs in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Detect the declared type of a file from its name.
    pub fn detect_type(&self, path: &Path) -> DocumentType {
        DocumentType::from_path(path)
    }

    /// Whether the injected converter can run on this host.
    pub fn converter_available(&self) -> bool {
        self.converter.is_available()
    }

    /// Convert a non-PDF source into a temporary PDF.
    ///
    /// PDFs are never passed through here by the executor; asking for one is
    /// reported as unsupported since there is nothing to convert. ODP and ODT
    /// documents have no converter and are reported the same way.
    pub fn convert_to_pdf(&self, file: &SourceFile) -> ConversionOutcome {
        let kind = self.detect_type(file.path());

        if !kind.is_convertible() {
            debug!(path = %file.path().display(), %kind, "no converter for document type");
            return ConversionOutcome::failure(kind, JoinerError::ConversionUnsupported { kind });
        }

        let temp = match self.create_temp_pdf() {
            Ok(temp) => temp,
            Err(err) => {
                return ConversionOutcome::failure(
                    kind,
                    JoinerError::conversion_failed(
                        file.path(),
                        format!("cannot create temporary PDF: {err}"),
                    ),
                );
            }
        };

        debug!(
            source = %file.path().display(),
            target = %temp.display(),
            %kind,
            "converting to PDF"
        );

        match self.converter.convert(file.path(), kind, &temp) {
            Ok(()) => ConversionOutcome::success(
                kind,
                ConvertedPdf::new(file.path().to_path_buf(), temp),
            ),
            Err(err) => {
                warn!(path = %file.path().display(), error = %err, "conversion failed");
                let err = match err {
                    JoinerError::ConversionFailed { .. } | JoinerError::ConversionUnsupported { .. } => {
                        err
                    }
                    other => JoinerError::conversion_failed(file.path(), other.to_string()),
                };
                ConversionOutcome::failure(kind, err)
            }
        }
    }

    fn create_temp_pdf(&self) -> std::io::Result<tempfile::TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(".pdf");

        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        Ok(file.into_temp_path())
    }
}

impl std::fmt::Debug for ConversionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionDispatcher")
            .field("temp_dir", &self.temp_dir)
            .finish_non_exhaustive()
    }
}

//! PDF concatenation.
//!
//! The executor talks to the merge engine through the [`PdfMerger`] trait.
//! [`LopdfMerger`] is the production implementation.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoiner::merge::{LopdfMerger, MergeOptions, PdfMerger};
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let stats = LopdfMerger::new().merge(&inputs, Path::new("joined.pdf"), &MergeOptions::default())?;
//! println!("Joined {} pages", stats.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod merger;

pub use merger::{LopdfMerger, MergeStatistics};

use std::path::{Path, PathBuf};

use crate::config::CompressionLevel;
use crate::error::Result;

/// Options passed to the merge engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Compression applied to the joined document.
    pub compression: CompressionLevel,
}

/// Concatenates PDFs into a new file.
pub trait PdfMerger: Send + Sync {
    /// Write the pages of `inputs`, in order, into a new PDF at `destination`.
    ///
    /// The destination must appear atomically: either the complete document
    /// is there afterwards, or nothing was written.
    fn merge(
        &self,
        inputs: &[PathBuf],
        destination: &Path,
        options: &MergeOptions,
    ) -> Result<MergeStatistics>;
}

//! pdfjoiner - Order PDF and Office documents and join them into one PDF.
//!
//! Sources are kept in a [`SourceList`] whose order is the page order of the
//! result. Word and PowerPoint documents are converted to temporary PDFs
//! through Microsoft Office before the pages are concatenated.
//!
//! The library is organised around three replaceable seams:
//!
//! - [`convert::DocumentConverter`] turns an Office document into a PDF
//! - [`merge::PdfMerger`] concatenates PDFs into a destination file
//! - [`viewer::Viewer`] shows the result to the user
//!
//! # Examples
//!
//! ## Driving a session
//!
//! ```no_run
//! use pdfjoiner::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::with_defaults();
//! session.append(["cover.pdf", "report.docx", "slides.pptx"]);
//! session.set_destination("bundle.pdf");
//!
//! let report = session.run_merge().await?;
//! println!("Created {} page document", report.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the merge engine directly
//!
//! ```no_run
//! use pdfjoiner::merge::{LopdfMerger, MergeOptions, PdfMerger};
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let stats = LopdfMerger::new().merge(
//!     &inputs,
//!     Path::new("merged.pdf"),
//!     &MergeOptions::default(),
//! )?;
//! println!("{} pages", stats.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod convert;
pub mod error;
pub mod executor;
pub mod io;
pub mod list;
pub mod merge;
pub mod output;
pub mod session;
pub mod utils;
pub mod validation;
pub mod viewer;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use convert::DocumentType;
pub use error::{JoinerError, Result};
pub use executor::{ExecutorState, MergeExecutor, MergePlan, MergeReport, MergeRequest};
pub use list::{Direction, SourceFile, SourceList};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! The context object a front end drives.
//!
//! A [`Session`] owns the source list, the chosen destination and the
//! executor. Runs take a snapshot of the list, so editing the list while a
//! background run is in flight never affects that run.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoiner::list::Direction;
//! use pdfjoiner::session::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::with_defaults();
//! session.append(["intro.pdf", "slides.pptx", "appendix.pdf"]);
//! session.reorder(1, Direction::Up);
//! session.set_destination("joined.pdf");
//!
//! let report = session.run_merge().await?;
//! println!("{} pages written", report.total_pages);
//! session.view_result()?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::convert::office::DEFAULT_TIMEOUT;
use crate::error::{JoinerError, Result};
use crate::executor::{MergeExecutor, MergeHandle, MergePlan, MergeReport, MergeRequest};
use crate::list::{Direction, SourceFile, SourceList};
use crate::merge::MergeOptions;
use crate::viewer::{SystemViewer, Viewer};

/// Source list, destination and executor for one user.
pub struct Session {
    sources: SourceList,
    destination: Option<PathBuf>,
    options: MergeOptions,
    executor: MergeExecutor,
    viewer: Arc<dyn Viewer>,
    last_result: Option<PathBuf>,
}

impl Session {
    /// Create a session around an executor.
    pub fn new(executor: MergeExecutor) -> Self {
        Self {
            sources: SourceList::new(),
            destination: None,
            options: MergeOptions::default(),
            executor,
            viewer: Arc::new(SystemViewer),
            last_result: None,
        }
    }

    /// Session with Office conversion, lopdf merging and the system viewer.
    pub fn with_defaults() -> Self {
        Self::new(MergeExecutor::with_office(DEFAULT_TIMEOUT))
    }

    /// Replace the viewer used by [`Session::view_result`].
    pub fn with_viewer(mut self, viewer: Arc<dyn Viewer>) -> Self {
        self.viewer = viewer;
        self
    }

    /// Add files to the end of the list.
    pub fn append<I, F>(&mut self, files: I)
    where
        I: IntoIterator<Item = F>,
        F: Into<SourceFile>,
    {
        self.sources.append(files);
    }

    /// Remove every entry for `path`; returns how many were removed.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> usize {
        self.sources.remove(path)
    }

    /// Move the entry at `index` one step; `false` if it cannot move.
    pub fn reorder(&mut self, index: usize, direction: Direction) -> bool {
        self.sources.reorder(index, direction)
    }

    /// The current list.
    pub fn sources(&self) -> &SourceList {
        &self.sources
    }

    /// Choose where the joined PDF is written.
    pub fn set_destination(&mut self, path: impl Into<PathBuf>) {
        self.destination = Some(path.into());
    }

    /// The chosen destination, if any.
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Set the merge engine options for later runs.
    pub fn set_options(&mut self, options: MergeOptions) {
        self.options = options;
    }

    /// The executor behind this session.
    pub fn executor(&self) -> &MergeExecutor {
        &self.executor
    }

    /// Destination of the last successful run.
    pub fn last_result(&self) -> Option<&Path> {
        self.last_result.as_deref()
    }

    /// Snapshot the list and destination into a request.
    pub fn request(&self) -> Result<MergeRequest> {
        let destination = self.destination.clone().ok_or_else(|| {
            JoinerError::destination_unwritable(PathBuf::new(), "no destination selected")
        })?;

        let sources = self.sources.as_slice().to_vec();
        Ok(MergeRequest::new(sources, destination).with_options(self.options))
    }

    /// Validate the current list and destination without writing.
    pub async fn plan(&self) -> Result<MergePlan> {
        let request = self.request()?;
        self.executor.validate(&request).await
    }

    /// Join the current list into the destination.
    pub async fn run_merge(&mut self) -> Result<MergeReport> {
        let request = self.request()?;
        let report = self.executor.run(request).await?;

        debug!(destination = %report.destination.display(), "remembering joined PDF");
        self.last_result = Some(report.destination.clone());

        Ok(report)
    }

    /// Join the current list on a background task.
    ///
    /// Use [`Session::finish_merge`] with the handle to record the result.
    pub fn spawn_merge(&self) -> Result<MergeHandle> {
        let request = self.request()?;
        self.executor.spawn(request)
    }

    /// Wait for a background run and record its result.
    pub async fn finish_merge(&mut self, handle: MergeHandle) -> Result<MergeReport> {
        let report = handle.wait().await?;
        self.last_result = Some(report.destination.clone());
        Ok(report)
    }

    /// Open the last joined PDF in the viewer.
    pub fn view_result(&self) -> Result<()> {
        let Some(path) = &self.last_result else {
            return Err(JoinerError::viewer_unavailable("no joined PDF to show yet"));
        };

        self.viewer.open(path)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("sources", &self.sources)
            .field("destination", &self.destination)
            .field("options", &self.options)
            .field("last_result", &self.last_result)
            .finish_non_exhaustive()
    }
}

//! Validates and runs join requests.
//!
//! A run moves through `Idle → Validating → Merging → Idle`. Any failure
//! passes through `Failed` before returning to `Idle`. Callers can watch the
//! state through [`MergeExecutor::subscribe`].
//!
//! At most one run is active per executor; a second request made while a run
//! is in flight fails immediately with [`JoinerError::MergeInProgress`].
//!
//! Conversion and merging block, so both run on tokio's blocking pool.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::config::CompressionLevel;
use crate::convert::{ConversionDispatcher, ConvertedPdf, OfficeConverter};
use crate::error::{JoinerError, Result};
use crate::list::SourceFile;
use crate::merge::{LopdfMerger, MergeOptions, PdfMerger};
use crate::utils::format_file_size;
use crate::validation::{ValidationSummary, Validator};

/// Observable executor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorState {
    /// No run is active.
    Idle,
    /// Checking the destination and sources.
    Validating,
    /// Converting sources and concatenating pages.
    Merging,
    /// The current run failed; the executor returns to idle right after.
    Failed,
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Merging => "merging",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Snapshot of everything one run needs.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Sources in join order.
    pub sources: Vec<SourceFile>,
    /// Output path.
    pub destination: PathBuf,
    /// Merge engine options.
    pub options: MergeOptions,
}

impl MergeRequest {
    /// Request joining `sources` into `destination` with default options.
    pub fn new(sources: Vec<SourceFile>, destination: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            destination: destination.into(),
            options: MergeOptions::default(),
        }
    }

    /// Replace the merge options.
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }
}

/// What a dry run found.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Output path.
    pub destination: PathBuf,
    /// Checked sources and totals.
    #[serde(flatten)]
    pub summary: ValidationSummary,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Where the joined PDF was written.
    pub destination: PathBuf,
    /// Number of sources joined.
    pub files_merged: usize,
    /// Number of sources converted to PDF first.
    pub files_converted: usize,
    /// Pages in the joined PDF.
    pub total_pages: usize,
    /// Size of the joined PDF in bytes.
    pub output_size: u64,
    /// Compression applied.
    pub compression: CompressionLevel,
    /// Wall-clock time of the whole run.
    #[serde(rename = "elapsedMs", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl MergeReport {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Handle to a run started with [`MergeExecutor::spawn`].
#[derive(Debug)]
pub struct MergeHandle {
    cancel: Arc<AtomicBool>,
    task: JoinHandle<Result<MergeReport>>,
}

impl MergeHandle {
    /// Ask the run to stop.
    ///
    /// The flag is checked before each conversion and before merging; a
    /// conversion or merge already under way finishes first.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Whether the run has completed.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to complete.
    pub async fn wait(self) -> Result<MergeReport> {
        self.task
            .await
            .map_err(|e| JoinerError::merge_failed(format!("join task failed: {e}")))?
    }
}

struct Inner {
    dispatcher: ConversionDispatcher,
    merger: Arc<dyn PdfMerger>,
    validator: Validator,
    state: watch::Sender<ExecutorState>,
    guard: Arc<Mutex<()>>,
}

impl Inner {
    fn set_state(&self, state: ExecutorState) {
        self.state.send_replace(state);
    }
}

/// Runs join requests against injected conversion and merge capabilities.
#[derive(Clone)]
pub struct MergeExecutor {
    inner: Arc<Inner>,
}

impl MergeExecutor {
    /// Create an executor from a conversion dispatcher and a merge engine.
    pub fn new(dispatcher: ConversionDispatcher, merger: Arc<dyn PdfMerger>) -> Self {
        let (state, _) = watch::channel(ExecutorState::Idle);

        Self {
            inner: Arc::new(Inner {
                dispatcher,
                merger,
                validator: Validator::new(),
                state,
                guard: Arc::new(Mutex::new(())),
            }),
        }
    }

    /// Executor using Microsoft Office for conversion and lopdf for merging.
    pub fn with_office(conversion_timeout: Duration) -> Self {
        let converter = OfficeConverter::new().with_timeout(conversion_timeout);
        Self::new(
            ConversionDispatcher::new(Arc::new(converter)),
            Arc::new(LopdfMerger::new()),
        )
    }

    /// Current state.
    pub fn state(&self) -> ExecutorState {
        *self.inner.state.borrow()
    }

    /// Receive state changes.
    pub fn subscribe(&self) -> watch::Receiver<ExecutorState> {
        self.inner.state.subscribe()
    }

    /// Whether a run is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.guard.try_lock().is_err()
    }

    /// The conversion dispatcher used for non-PDF sources.
    pub fn dispatcher(&self) -> &ConversionDispatcher {
        &self.inner.dispatcher
    }

    /// Check a request without converting or writing anything.
    pub async fn validate(&self, request: &MergeRequest) -> Result<MergePlan> {
        let summary = self.validate_blocking(request).await?;

        Ok(MergePlan {
            destination: request.destination.clone(),
            summary,
        })
    }

    /// Run a request to completion on the current task.
    pub async fn run(&self, request: MergeRequest) -> Result<MergeReport> {
        let permit = self.acquire()?;
        let cancel = Arc::new(AtomicBool::new(false));
        self.run_guarded(request, cancel, permit).await
    }

    /// Start a request on a background task.
    ///
    /// Fails immediately if another run is active. Must be called from within
    /// a tokio runtime.
    pub fn spawn(&self, request: MergeRequest) -> Result<MergeHandle> {
        let permit = self.acquire()?;
        let cancel = Arc::new(AtomicBool::new(false));

        let executor = self.clone();
        let flag = cancel.clone();
        let task = tokio::spawn(async move { executor.run_guarded(request, flag, permit).await });

        Ok(MergeHandle { cancel, task })
    }

    fn acquire(&self) -> Result<OwnedMutexGuard<()>> {
        self.inner
            .guard
            .clone()
            .try_lock_owned()
            .map_err(|_| JoinerError::MergeInProgress)
    }

    async fn run_guarded(
        &self,
        request: MergeRequest,
        cancel: Arc<AtomicBool>,
        _permit: OwnedMutexGuard<()>,
    ) -> Result<MergeReport> {
        info!(
            sources = request.sources.len(),
            destination = %request.destination.display(),
            "starting join"
        );

        let result = self.execute(request, &cancel).await;

        match &result {
            Ok(report) => info!(
                pages = report.total_pages,
                converted = report.files_converted,
                size = %report.format_output_size(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                "join finished"
            ),
            Err(err) => {
                warn!(error = %err, "join failed");
                self.inner.set_state(ExecutorState::Failed);
            }
        }

        self.inner.set_state(ExecutorState::Idle);
        result
    }

    async fn execute(&self, request: MergeRequest, cancel: &AtomicBool) -> Result<MergeReport> {
        let started = Instant::now();

        self.inner.set_state(ExecutorState::Validating);
        self.validate_blocking(&request).await?;

        self.inner.set_state(ExecutorState::Merging);

        // Held until the merge returns; dropping removes the temporary PDFs.
        let mut converted: Vec<ConvertedPdf> = Vec::new();
        let mut inputs = Vec::with_capacity(request.sources.len());

        for source in &request.sources {
            check_cancelled(cancel)?;

            if source.document_type().is_pdf() {
                debug!(path = %source.path().display(), "using PDF as-is");
                inputs.push(source.path().to_path_buf());
                continue;
            }

            let pdf = self.convert(source.clone()).await?;
            inputs.push(pdf.path().to_path_buf());
            converted.push(pdf);
        }

        check_cancelled(cancel)?;

        let merger = self.inner.merger.clone();
        let destination = request.destination.clone();
        let options = request.options;
        let stats = task::spawn_blocking(move || merger.merge(&inputs, &destination, &options))
            .await
            .map_err(|e| JoinerError::merge_failed(format!("merge task failed: {e}")))??;

        Ok(MergeReport {
            destination: request.destination,
            files_merged: request.sources.len(),
            files_converted: converted.len(),
            total_pages: stats.total_pages,
            output_size: stats.output_size,
            compression: stats.compression,
            elapsed: started.elapsed(),
        })
    }

    async fn convert(&self, source: SourceFile) -> Result<ConvertedPdf> {
        let dispatcher = self.inner.dispatcher.clone();
        let path = source.path().to_path_buf();

        let outcome = task::spawn_blocking(move || dispatcher.convert_to_pdf(&source))
            .await
            .map_err(|e| {
                JoinerError::conversion_failed(&path, format!("conversion task failed: {e}"))
            })?;

        debug!(
            path = %path.display(),
            kind = %outcome.source_type,
            ok = outcome.is_success(),
            "conversion done"
        );
        outcome.into_result()
    }

    async fn validate_blocking(&self, request: &MergeRequest) -> Result<ValidationSummary> {
        let validator = self.inner.validator;
        let destination = request.destination.clone();
        let sources = request.sources.clone();

        task::spawn_blocking(move || validator.validate(&destination, &sources))
            .await
            .map_err(|e| JoinerError::merge_failed(format!("validation task failed: {e}")))?
    }
}

impl fmt::Debug for MergeExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeExecutor")
            .field("state", &self.state())
            .field("dispatcher", &self.inner.dispatcher)
            .finish_non_exhaustive()
    }
}

fn check_cancelled(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::SeqCst) {
        debug!("join cancelled");
        return Err(JoinerError::Cancelled);
    }
    Ok(())
}

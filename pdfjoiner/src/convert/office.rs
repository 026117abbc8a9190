//! Microsoft Office backed conversion.
//!
//! Word and PowerPoint are driven through their COM automation interface from
//! a PowerShell child process. This needs a Windows host with Office
//! installed; everywhere else the converter reports a failure for every
//! document.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::{DocumentConverter, DocumentType};
use crate::error::{JoinerError, Result};

/// Default time allowed for a single document conversion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Bytes of PowerShell error output kept for the failure message.
const STDERR_LIMIT: usize = 8 * 1024;

// wdFormatPDF = 17
const WORD_SCRIPT: &str = r#"
$ErrorActionPreference = 'Stop'
$word = New-Object -ComObject Word.Application
$word.Visible = $false
$word.DisplayAlerts = 0
try {
    $doc = $word.Documents.Open($env:PDFJOINER_SOURCE, $false, $true)
    try {
        $doc.ExportAsFixedFormat($env:PDFJOINER_TARGET, 17)
    } finally {
        $doc.Close(0)
    }
} finally {
    $word.Quit()
}
"#;

// ppSaveAsPDF = 32; Open(FileName, ReadOnly, Untitled, WithWindow) takes MsoTriState
const POWERPOINT_SCRIPT: &str = r#"
$ErrorActionPreference = 'Stop'
$ppt = New-Object -ComObject PowerPoint.Application
try {
    $pres = $ppt.Presentations.Open($env:PDFJOINER_SOURCE, -1, 0, 0)
    try {
        $pres.SaveAs($env:PDFJOINER_TARGET, 32)
    } finally {
        $pres.Close()
    }
} finally {
    $ppt.Quit()
}
"#;

/// Converts Word and PowerPoint documents using a local Office installation.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: PathBuf,
    timeout: Duration,
}

impl OfficeConverter {
    /// Create a converter with the default timeout.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("powershell.exe"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-document timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a different PowerShell executable (e.g. `pwsh.exe`).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// The configured per-document timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn script_for(kind: DocumentType) -> Option<&'static str> {
        if kind.is_word() {
            Some(WORD_SCRIPT)
        } else if kind.is_presentation() {
            Some(POWERPOINT_SCRIPT)
        } else {
            None
        }
    }

    fn run_script(&self, script: &str, source: &Path, target: &Path) -> Result<()> {
        // COM automation resolves relative paths against Office's own working directory.
        let source = std::path::absolute(source)?;
        let target = std::path::absolute(target)?;

        let mut child = Command::new(&self.program)
            .args([
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
                script,
            ])
            .env("PDFJOINER_SOURCE", &source)
            .env("PDFJOINER_TARGET", &target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                JoinerError::conversion_failed(
                    &source,
                    format!("cannot start {}: {err}", self.program.display()),
                )
            })?;

        let stderr = drain(child.stderr.take());
        let status = wait_with_timeout(&mut child, self.timeout)?;

        let Some(status) = status else {
            return Err(JoinerError::conversion_failed(
                &source,
                format!("Office did not finish within {}s", self.timeout.as_secs()),
            ));
        };

        if !status.success() {
            let stderr = stderr.join().unwrap_or_default();
            return Err(JoinerError::conversion_failed(
                &source,
                format!("Office exited with {status}: {}", stderr.trim()),
            ));
        }

        let written = std::fs::metadata(&target).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(JoinerError::conversion_failed(
                &source,
                "Office reported success but produced no PDF",
            ));
        }

        Ok(())
    }
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for OfficeConverter {
    fn convert(&self, source: &Path, kind: DocumentType, target: &Path) -> Result<()> {
        let Some(script) = Self::script_for(kind) else {
            return Err(JoinerError::ConversionUnsupported { kind });
        };

        if !self.is_available() {
            return Err(JoinerError::conversion_failed(
                source,
                "Office conversion requires a Windows host with Microsoft Office installed",
            ));
        }

        info!(source = %source.display(), %kind, "converting with Microsoft Office");
        let started = Instant::now();
        self.run_script(script, source, target)?;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "conversion finished");

        Ok(())
    }

    fn is_available(&self) -> bool {
        cfg!(windows)
    }
}

/// Read `pipe` to the end on its own thread, keeping the first
/// [`STDERR_LIMIT`] bytes.
///
/// The child would block on a full pipe while we poll it, so the output has
/// to be consumed as it arrives.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut kept = Vec::new();
        let Some(mut pipe) = pipe else {
            return String::new();
        };

        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let room = STDERR_LIMIT.saturating_sub(kept.len());
                    kept.extend_from_slice(&buf[..n.min(room)]);
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }

        String::from_utf8_lossy(&kept).into_owned()
    })
}

/// Wait for `child` to exit, killing it once `timeout` has elapsed.
///
/// Returns `None` when the child had to be killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if Instant::now() >= deadline {
            child.kill().ok();
            child.wait()?;
            return Ok(None);
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

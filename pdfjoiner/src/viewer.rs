//! Opening the joined PDF in the desktop's default viewer.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{JoinerError, Result};

/// Capability that shows a PDF to the user.
pub trait Viewer: Send + Sync {
    /// Open `path` for viewing.
    fn open(&self, path: &Path) -> Result<()>;
}

/// Hands the file to the platform's launcher (`cmd /C start`, `open`,
/// `xdg-open`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl SystemViewer {
    fn launcher(path: &Path) -> Option<Command> {
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            // `start` takes the first quoted argument as the window title
            cmd.args(["/C", "start", ""]).arg(path);
            Some(cmd)
        }

        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            Some(cmd)
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            Some(cmd)
        }

        #[cfg(not(any(windows, unix)))]
        {
            let _ = path;
            None
        }
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(JoinerError::viewer_unavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let Some(mut cmd) = Self::launcher(path) else {
            return Err(JoinerError::viewer_unavailable(
                "no desktop launcher on this platform",
            ));
        };

        debug!(?cmd, "launching viewer");

        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                JoinerError::viewer_unavailable(format!(
                    "cannot start {}: {e}",
                    cmd.get_program().to_string_lossy()
                ))
            })?;

        if !status.success() {
            return Err(JoinerError::viewer_unavailable(format!(
                "{} exited with {status}",
                cmd.get_program().to_string_lossy()
            )));
        }

        Ok(())
    }
}

//! Indeterminate progress indicator.
//!
//! Joining has no meaningful percentage (Office conversion time is
//! unpredictable), so the indicator is a spinner with a status message and
//! the elapsed time. It draws on stderr and only when stderr is a terminal.
//!
//! # Examples
//!
//! ```
//! use pdfjoiner::output::progress::{Spinner, SpinnerStyle};
//!
//! let mut spinner = Spinner::new(SpinnerStyle::Braille);
//! spinner.set_message("Processing");
//! spinner.tick();
//! spinner.finish_and_clear();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// Animation frames used by the spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStyle {
    /// ⠋ ⠙ ⠹ ⠸ ⠼ ⠴ ⠦ ⠧ ⠇ ⠏
    Braille,
    /// ⣾ ⣽ ⣻ ⢿ ⡿ ⣟ ⣯ ⣷
    Dots,
}

impl SpinnerStyle {
    fn frames(self) -> &'static [&'static str] {
        match self {
            Self::Braille => &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            Self::Dots => &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
        }
    }
}

/// Spinner shown while a join is running.
#[derive(Debug)]
pub struct Spinner {
    style: SpinnerStyle,
    message: Option<String>,
    start_time: Instant,
    frame: usize,
    enabled: bool,
}

impl Spinner {
    /// Interval at which callers should call [`Spinner::tick`].
    pub const TICK: Duration = Duration::from_millis(100);

    /// Create a spinner that draws when stderr is a terminal.
    pub fn new(style: SpinnerStyle) -> Self {
        Self {
            style,
            message: None,
            start_time: Instant::now(),
            frame: 0,
            enabled: io::stderr().is_terminal(),
        }
    }

    /// Create a spinner that never draws.
    pub fn disabled() -> Self {
        let mut spinner = Self::new(SpinnerStyle::Braille);
        spinner.enabled = false;
        spinner
    }

    /// Whether the spinner draws anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the status text shown next to the spinner.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Advance one frame and redraw.
    pub fn tick(&mut self) {
        let line = self.next_frame();
        if self.enabled {
            let mut stderr = io::stderr();
            write!(stderr, "\r\x1b[K{line}").ok();
            stderr.flush().ok();
        }
    }

    /// Erase the spinner line.
    pub fn finish_and_clear(&mut self) {
        if self.enabled {
            let mut stderr = io::stderr();
            write!(stderr, "\r\x1b[K").ok();
            stderr.flush().ok();
        }
    }

    /// Time since the spinner was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn next_frame(&mut self) -> String {
        let frames = self.style.frames();
        let frame = frames[self.frame % frames.len()];
        self.frame += 1;

        let elapsed = format_duration(self.start_time.elapsed());
        match &self.message {
            Some(message) => format!("{frame} {message} {elapsed}"),
            None => format!("{frame} {elapsed}"),
        }
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

//! Configuration for a join run.
//!
//! Front ends turn their arguments into a [`Config`], validate it, and then
//! drive a [`Session`](crate::session::Session) from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::convert::office::DEFAULT_TIMEOUT;
use crate::error::{JoinerError, Result};
use crate::list::Direction;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Compress content streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = JoinerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(JoinerError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Maximum => "maximum",
        };
        f.write_str(name)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// A single-step move of a list entry, addressed by 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// 1-based position of the entry at the time the move is applied.
    pub position: usize,
    /// Direction of the move.
    pub direction: Direction,
}

impl Move {
    /// Move the entry at `position` one step toward the start.
    pub fn up(position: usize) -> Self {
        Self {
            position,
            direction: Direction::Up,
        }
    }

    /// Move the entry at `position` one step toward the end.
    pub fn down(position: usize) -> Self {
        Self {
            position,
            direction: Direction::Down,
        }
    }

    /// 0-based index for [`SourceList::reorder`](crate::list::SourceList::reorder).
    pub fn index(&self) -> usize {
        self.position.saturating_sub(1)
    }
}

/// Complete configuration for a join run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source paths in join order, before exclusions and moves.
    pub sources: Vec<PathBuf>,

    /// Destination PDF path.
    pub destination: PathBuf,

    /// Paths removed from the list after collection.
    pub excludes: Vec<PathBuf>,

    /// Reorderings applied after exclusions, in the given order.
    pub moves: Vec<Move>,

    /// Validate and print the plan without writing anything.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Open the joined PDF in the default viewer afterwards.
    pub open_result: bool,

    /// Per-document timeout for Office conversion.
    pub conversion_timeout: Duration,

    /// Print a JSON summary instead of text.
    pub json: bool,
}

impl Config {
    /// Configuration for `destination` with defaults for everything else.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            sources: Vec::new(),
            destination: destination.into(),
            excludes: Vec::new(),
            moves: Vec::new(),
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            open_result: false,
            conversion_timeout: DEFAULT_TIMEOUT,
            json: false,
        }
    }

    /// Validate the configuration.
    ///
    /// An empty source list is not rejected here; the executor reports it
    /// when the run is validated.
    ///
    /// # Errors
    ///
    /// Returns [`JoinerError::InvalidConfig`] if:
    /// - Verbose and quiet modes are both enabled
    /// - The destination is also a source
    /// - A move position is zero
    /// - The conversion timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(JoinerError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.sources.iter().any(|s| s == &self.destination) {
            return Err(JoinerError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                self.destination.display()
            )));
        }

        if self.moves.iter().any(|m| m.position == 0) {
            return Err(JoinerError::invalid_config(
                "Move positions are 1-based; 0 is not a valid position",
            ));
        }

        if self.conversion_timeout.is_zero() {
            return Err(JoinerError::invalid_config(
                "Conversion timeout must be at least 1 second",
            ));
        }

        Ok(())
    }

    /// Whether human-readable output should be printed.
    ///
    /// Dry runs always print their plan.
    pub fn should_print(&self) -> bool {
        !self.json && (!self.quiet || self.dry_run)
    }
}

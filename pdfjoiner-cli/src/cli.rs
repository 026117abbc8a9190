//! CLI argument parsing for pdfjoiner.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by `build.rs` to render the man page, so it only
//! depends on `clap`, `tokio` and the library.

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use pdfjoiner::config::{CompressionLevel, Config, Move, OverwriteMode};
use pdfjoiner::error::{JoinerError, Result};
use pdfjoiner::utils::collect_paths_for_patterns;

/// Order PDF, Word and PowerPoint documents and join them into one PDF.
///
/// Word (.doc, .docx) and PowerPoint (.ppt, .pptx) files are converted to PDF
/// through Microsoft Office before joining, which requires a Windows host
/// with Office installed.
#[derive(Parser, Debug)]
#[command(name = "pdfjoiner")]
#[command(version)]
#[command(about = "Order PDF and Office documents and join them into a single PDF", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input documents to join (in order)
    ///
    /// PDF, DOC, DOCX, PPT and PPTX files. Glob patterns are expanded in
    /// place; matches of one pattern are sorted by name.
    ///
    /// Examples:
    ///   pdfjoiner cover.pdf report.docx slides.pptx -o bundle.pdf
    ///   pdfjoiner 'chapters/*.pdf' -o book.pdf
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// A `.pdf` suffix is added when the name does not already end in one.
    /// Use --force to overwrite existing files without confirmation.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Read more inputs from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored. Use '-' to read
    /// from stdin. Paths from the list are appended after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Remove every occurrence of a path from the list
    ///
    /// Applied after all inputs are collected. May be repeated.
    #[arg(long, value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// Move the entry at position N (1-based) one step toward the start
    ///
    /// Applied after exclusions, together with --move-down, in the order
    /// given on the command line. May be repeated.
    #[arg(long, value_name = "N")]
    pub move_up: Vec<usize>,

    /// Move the entry at position N (1-based) one step toward the end
    #[arg(long, value_name = "N")]
    pub move_down: Vec<usize>,

    /// Reorderings from --move-up and --move-down in command-line order
    #[arg(skip)]
    pub moves: Vec<Move>,

    /// Dry run - validate inputs and show the plan without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show timings and conversion details
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression (preserves exact structure)
    /// - standard: Compress content streams (default)
    /// - maximum: Also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Open the joined PDF in the default viewer afterwards
    #[arg(long)]
    pub open: bool,

    /// Seconds to wait for Office to convert one document
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub conversion_timeout: u64,

    /// Print a JSON summary to stdout instead of text
    #[arg(long)]
    pub json: bool,

    /// Log filter for diagnostics on stderr (e.g. "debug", "pdfjoiner=trace")
    #[arg(long, value_name = "FILTER", env = "PDFJOINER_LOG")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse the process arguments, exiting with usage on error.
    pub fn parse_args() -> Self {
        let matches = Self::command().get_matches();
        Self::from_matches(&matches).unwrap_or_else(|err| err.exit())
    }

    /// Build the CLI from parsed matches, keeping the relative order of
    /// `--move-up` and `--move-down`.
    pub fn from_matches(matches: &ArgMatches) -> std::result::Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;

        let mut ordered: Vec<(usize, Move)> = Vec::new();
        for (id, make) in [
            ("move_up", Move::up as fn(usize) -> Move),
            ("move_down", Move::down),
        ] {
            let (Some(values), Some(indices)) =
                (matches.get_many::<usize>(id), matches.indices_of(id))
            else {
                continue;
            };
            ordered.extend(indices.zip(values.map(|&position| make(position))));
        }
        ordered.sort_by_key(|(index, _)| *index);

        cli.moves = ordered.into_iter().map(|(_, m)| m).collect();
        Ok(cli)
    }

    /// Convert CLI arguments into a Config.
    ///
    /// Sources are left empty; fill them from [`Cli::get_all_inputs`] and
    /// call [`Config::validate`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let mut config = Config::new(with_pdf_suffix(&self.output));
        config.excludes = self.exclude.clone();
        config.moves = self.moves.clone();
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.quiet = self.quiet;
        config.overwrite_mode = overwrite_mode;
        config.compression = compression;
        config.open_result = self.open;
        config.conversion_timeout = Duration::from_secs(self.conversion_timeout);
        config.json = self.json;

        Ok(config)
    }

    /// Get all input paths including those from the input list.
    ///
    /// Direct inputs are glob-expanded first; paths from `--input-list` are
    /// appended after them as written.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid, the input list cannot be
    /// read, or nothing was given at all.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = collect_paths_for_patterns(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            all_inputs.extend(read_input_list(input_list_path).await?);
        }

        if all_inputs.is_empty() {
            return Err(JoinerError::EmptySourceList);
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a file, or stdin for `-`.
async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    use tokio::io::AsyncReadExt;

    let read_err = |source| JoinerError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    let contents = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .map_err(read_err)?;
        buffer
    } else {
        tokio::fs::read_to_string(path).await.map_err(read_err)?
    };

    Ok(parse_input_list(&contents))
}

fn parse_input_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// Append `.pdf` to an output name that does not already end in it.
fn with_pdf_suffix(path: &Path) -> PathBuf {
    let has_suffix = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if has_suffix || path.file_name().is_none() {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_owned();
    name.push(".pdf");
    PathBuf::from(name)
}

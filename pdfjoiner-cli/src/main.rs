//! pdfjoiner - Order PDF and Office documents and join them into one PDF.
//!
//! Command-line front end over the `pdfjoiner` library session.

mod cli;

use serde::Serialize;
use std::future::Future;
use std::io::{self, Write};
use std::process;

use tokio::time;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfjoiner::config::{Config, OverwriteMode};
use pdfjoiner::error::{JoinerError, Result};
use pdfjoiner::merge::MergeOptions;
use pdfjoiner::output::{OutputFormatter, Spinner, SpinnerStyle, display_plan, display_report};
use pdfjoiner::validation::Validator;
use pdfjoiner::{ExecutorState, MergeExecutor, MergeReport, Session};

const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level.as_deref());

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Send diagnostics to stderr, filtered by `--log-level` / `PDFJOINER_LOG`.
fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let sources = cli.get_all_inputs().await?;
    let mut config = cli.to_config()?;
    config.sources = sources;
    config.validate()?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfjoiner::NAME, pdfjoiner::VERSION));
    }

    let mut session = Session::new(MergeExecutor::with_office(config.conversion_timeout));
    build_list(&mut session, &config, &formatter);
    session.set_destination(&config.destination);
    session.set_options(MergeOptions {
        compression: config.compression,
    });

    if config.dry_run {
        let plan = session.plan().await?;

        if config.json {
            print_json(&plan)?;
        } else {
            display_plan(&formatter, &plan);
            formatter.success("Dry run completed successfully");
            formatter.info("  Run without --dry-run to create the joined PDF");
        }
        return Ok(());
    }

    handle_output_overwrite(&config, &formatter)?;

    let report = join_with_progress(&mut session, &formatter, tokio::signal::ctrl_c()).await?;

    if config.json {
        print_json(&report)?;
    } else {
        display_report(&formatter, &report);
    }

    if config.open_result
        && let Err(err) = session.view_result()
    {
        formatter.warning(&format!("Could not open the joined PDF: {err}"));
    }

    Ok(())
}

/// Fill the session's list and apply exclusions and moves.
fn build_list(session: &mut Session, config: &Config, formatter: &OutputFormatter) {
    session.append(&config.sources);

    for exclude in &config.excludes {
        let removed = session.remove(exclude);
        if removed == 0 {
            formatter.warning(&format!("Not in the list: {}", exclude.display()));
        } else {
            formatter.debug(&format!("Excluded {} ({removed}x)", exclude.display()));
        }
    }

    for step in &config.moves {
        if !session.reorder(step.index(), step.direction) {
            warn!(position = step.position, direction = ?step.direction, "move ignored");
            formatter.warning(&format!(
                "Cannot move entry {} {:?}; list has {} entries",
                step.position,
                step.direction,
                session.sources().len()
            ));
        }
    }

    for (index, source) in session.sources().iter().enumerate() {
        formatter.debug(&format!("{}. {}", index + 1, source.path().display()));
    }
}

/// Run the join in the background, showing a spinner until it finishes.
///
/// `interrupt` resolving (Ctrl-C in production) asks the run to stop at the
/// next checkpoint. It is polled from one pinned future for the whole run so
/// that a signal arriving between polls is still seen.
async fn join_with_progress<F>(
    session: &mut Session,
    formatter: &OutputFormatter,
    interrupt: F,
) -> Result<MergeReport>
where
    F: Future<Output = io::Result<()>>,
{
    let mut spinner = if formatter.should_print() {
        Spinner::new(SpinnerStyle::Braille)
    } else {
        Spinner::disabled()
    };
    spinner.set_message("Processing");

    let mut states = session.executor().subscribe();
    let handle = session.spawn_merge()?;
    let mut ticker = time::interval(Spinner::TICK);
    let mut cancelling = false;
    tokio::pin!(interrupt);

    while !handle.is_finished() {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = states.changed() => {
                if changed.is_ok() {
                    spinner.set_message(state_message(*states.borrow_and_update()));
                }
            }
            _ = &mut interrupt, if !cancelling => {
                handle.cancel();
                cancelling = true;
                spinner.set_message("Cancelling");
            }
        }
        spinner.tick();
    }

    spinner.finish_and_clear();
    session.finish_merge(handle).await
}

fn state_message(state: ExecutorState) -> &'static str {
    match state {
        ExecutorState::Validating => "Checking files",
        ExecutorState::Merging => "Converting and joining",
        ExecutorState::Idle | ExecutorState::Failed => "Processing",
    }
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    let needs_prompt = Validator::new().check_overwrite(&config.destination, config.overwrite_mode)?;
    if !needs_prompt {
        return Ok(());
    }

    // Nobody to ask in quiet or JSON mode.
    if formatter.is_quiet() {
        return Err(JoinerError::OutputExists {
            path: config.destination.clone(),
        });
    }

    formatter.warning(&format!(
        "Output file already exists: {}",
        config.destination.display()
    ));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;

    if confirms(&response) {
        Ok(())
    } else {
        Err(JoinerError::Cancelled)
    }
}

fn confirms(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{json}");
    Ok(())
}

//! User-facing output for terminal front ends.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoiner::output::OutputFormatter;
//! use pdfjoiner::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Joining 3 files");
//! formatter.success("Done");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{Spinner, SpinnerStyle};

use crate::executor::{MergePlan, MergeReport};

/// Print a dry-run plan.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Join plan");

    for (index, source) in plan.summary.sources.iter().enumerate() {
        let note = if source.needs_conversion() {
            format!(" (convert from {})", source.document_type)
        } else {
            String::new()
        };
        formatter.list_item(index + 1, &format!("{}{note}", source.path.display()));
    }

    formatter.info(&format!(
        "\n{} file(s), {}, {} to convert",
        plan.summary.sources.len(),
        plan.summary.format_total_size(),
        plan.summary.conversions_needed
    ));
    formatter.info(&format!("Output: {}", plan.destination.display()));
}

/// Print the outcome of a successful run.
pub fn display_report(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.success(&format!(
        "Joined {} file(s) into {} ({} pages, {})",
        report.files_merged,
        report.destination.display(),
        report.total_pages,
        report.format_output_size()
    ));

    formatter.detail("Converted", &report.files_converted.to_string());
    formatter.detail("Compression", &report.compression.to_string());
    formatter.detail(
        "Time",
        &format!("{:.2}s", report.elapsed.as_secs_f64()),
    );
}

//! Path expansion and formatting helpers.

use crate::error::{JoinerError, Result};
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`. Patterns are expanded in the
/// order given; matches within one pattern come back sorted.
///
/// A pattern that names an existing file is taken literally, even if it
/// contains glob metacharacters (`deck [v2].pdf`). A pattern without
/// metacharacters is kept as a literal path even when nothing exists there,
/// so that a typo is reported as an unreadable source instead of silently
/// vanishing.
///
/// Errors:
/// - Invalid glob syntax.
/// - Filesystem errors from the glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./slides/*.pptx"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let literal = PathBuf::from(pattern);
    if !is_glob_pattern(pattern) || literal.exists() {
        return Ok(vec![literal]);
    }

    let paths = glob::glob(pattern).map_err(|err| {
        JoinerError::invalid_config(format!("invalid pattern '{pattern}': {err}"))
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| JoinerError::Io(err.into_error()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

//! Formatting functions for user-facing CLI output.
//!
//! Everything here prints to stderr so that `--stdout` output stays a
//! clean bundle.

use console::style;

use crate::boundary::SelectionWarning;
use crate::bundle::ReleaseBundle;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal selection warning.
pub fn display_selection_warning(warning: &SelectionWarning) {
    eprintln!("{} {}", style("⚠").yellow(), warning);
}

/// Summarise what went into a bundle.
///
/// Shows up to 20 paths; if more were selected, the remainder is counted.
pub fn display_bundle_summary(bundle: &ReleaseBundle, commits_scanned: usize) {
    eprintln!("\n{}", style(format!("Release bundle {}", bundle.name())).bold());
    eprintln!("  From: {}", bundle.start);
    eprintln!("  To:   {}", bundle.end.id);
    if commits_scanned > 0 {
        eprintln!("  Commits scanned: {}", commits_scanned);
    }
    eprintln!("  {}", style(format!("{} file(s):", bundle.files.len())).underlined());

    for (i, path) in bundle.paths().iter().take(20).enumerate() {
        eprintln!("  {}. {}", i + 1, path);
    }

    if bundle.files.len() > 20 {
        eprintln!("  ... and {} more files", bundle.files.len() - 20);
    }
}

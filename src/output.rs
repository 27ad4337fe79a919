//! CLI output formatting for the scanner and the browser.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! 2022: Found 2 files
//! 2023: Folder not found
//! 2024: Found 1 file
//!
//! Issues
//!     Could not parse: 2022-kim-01.jpg
//!
//! Summary
//! 2022
//!     2 files
//!     1 artist: Alban Ovanessian
//!     Media types: bts, final
//! 2023
//!     0 files
//! ```
//!
//! ## Browse
//!
//! ```text
//! Showing 2 works · 1 year · 1 artist · 2 mediums
//! 001 Alban Ovanessian · Bts
//!     2022 · 2022-alban_ovanessian-01-bts.jpeg
//!     Source: img/Archive/2022/2022-alban_ovanessian-01-bts.jpeg
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::filter::counted;
use crate::lazy::ImageSlot;
use crate::render::View;
use crate::scan::{ScanIssue, ScanReport};
use crate::types::YearBucket;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the scan report: per-year counts, issues, then the summary.
pub fn format_scan_output(report: &ScanReport) -> Vec<String> {
    let mut lines = Vec::new();

    for bucket in report.index.buckets() {
        let missing = report.issues.iter().any(
            |i| matches!(i, ScanIssue::MissingDirectory { year, .. } if *year == bucket.year),
        );
        if missing {
            lines.push(format!("{}: Folder not found", bucket.year));
        } else {
            lines.push(format!(
                "{}: Found {}",
                bucket.year,
                counted(bucket.records.len(), "file", "files")
            ));
        }
    }

    let reported: Vec<&ScanIssue> = report
        .issues
        .iter()
        .filter(|i| !matches!(i, ScanIssue::MissingDirectory { .. }))
        .collect();
    if !reported.is_empty() {
        lines.push(String::new());
        lines.push("Issues".to_string());
        for issue in reported {
            lines.push(format!("{}{}", indent(1), issue));
        }
    }

    lines.push(String::new());
    lines.push("Summary".to_string());
    for bucket in report.index.buckets() {
        lines.extend(format_year_summary(bucket));
    }

    lines
}

fn format_year_summary(bucket: &YearBucket) -> Vec<String> {
    let mut lines = vec![bucket.year.clone()];
    lines.push(format!(
        "{}{}",
        indent(1),
        counted(bucket.records.len(), "file", "files")
    ));
    if bucket.records.is_empty() {
        return lines;
    }

    let artists = distinct(bucket.records.iter().map(|r| r.artist_display()));
    let media = distinct(bucket.records.iter().map(|r| r.medium()));
    lines.push(format!(
        "{}{}: {}",
        indent(1),
        counted(artists.len(), "artist", "artists"),
        artists.join(", ")
    ));
    lines.push(format!("{}Media types: {}", indent(1), media.join(", ")));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(report: &ScanReport) {
    for line in format_scan_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Browse output
// ============================================================================

/// Format a view as a text listing: status line, then one entry per cell.
pub fn format_view(view: &View) -> Vec<String> {
    match view {
        View::Error { message } => vec![message.clone()],
        View::Empty => vec!["No media found for selected filters".to_string()],
        View::Grid { stats, cells } => {
            let mut lines = vec![stats.to_string()];
            for (i, cell) in cells.iter().enumerate() {
                lines.push(format!(
                    "{} {} \u{b7} {}",
                    format_index(i + 1),
                    cell.artist,
                    cell.medium
                ));
                lines.push(format!("{}{}", indent(1), cell.caption));
                lines.push(format!("{}Source: {}", indent(1), cell.image.src));
            }
            lines
        }
    }
}

/// Format the lazy-loading state after the first screen.
pub fn format_first_screen(slots: &[ImageSlot]) -> Vec<String> {
    let active: Vec<&str> = slots
        .iter()
        .filter(|s| s.is_active())
        .map(ImageSlot::src)
        .collect();
    let mut lines = vec![format!(
        "First screen loads {} of {}",
        active.len(),
        counted(slots.len(), "image", "images")
    )];
    lines.extend(active.iter().map(|src| format!("{}{}", indent(1), src)));
    lines
}

/// Print a view to stdout.
pub fn print_view(view: &View) {
    for line in format_view(view) {
        println!("{}", line);
    }
}

/// Print first-screen activation to stdout.
pub fn print_first_screen(slots: &[ImageSlot]) {
    for line in format_first_screen(slots) {
        println!("{}", line);
    }
}

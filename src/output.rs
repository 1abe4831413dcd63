//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every image is shown by its positional index and output name, with the
//! source path as indented context. The same index appears in the check
//! listing and in export progress, so a skipped or failed file can be traced
//! back to the input it came from.
//!
//! # Output Format
//!
//! ## Logos
//!
//! ```text
//! Logos: 5 of 6 loaded
//!     gear-white (Zahnrad Weiß): IO error: No such file or directory (os error 2)
//! ```
//!
//! ## Check
//!
//! ```text
//! Images
//! 001 einsatz.png (6000x4000)
//!     Source: shoot/einsatz.jpg
//!
//! Skipped
//!     shoot/kaputt.jpg: Failed to decode shoot/kaputt.jpg: ...
//!
//! Found 1 image, skipped 1
//! ```
//!
//! With `--json` the same report is printed as a [`CheckManifest`]:
//!
//! ```text
//! {
//!   "images": [
//!     { "source": "shoot/einsatz.jpg", "name": "einsatz.png", "width": 6000, "height": 4000 }
//!   ],
//!   "skipped": [
//!     { "source": "shoot/kaputt.jpg", "reason": "Failed to decode ..." }
//!   ]
//! }
//! ```
//!
//! ## Export
//!
//! ```text
//! Exporting 3 images → branded
//!     001 einsatz.png (6000x4000)
//!     002 pumpe.png: skipped, logo white not loaded
//!     003 nacht.png (4000x6000)
//! Exported 2 images, skipped 1
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::export::ExportEvent;
use crate::ingest::{IngestReport, Skipped};
use crate::logos::LogoLoad;
use crate::naming::display_name;
use serde::Serialize;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 image`, `2 images`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Logos
// ============================================================================

pub fn format_logo_load(load: &LogoLoad) -> Vec<String> {
    let total = load.cache.len() + load.failures.len();
    let mut lines = vec![format!("Logos: {} of {} loaded", load.cache.len(), total)];
    for failure in &load.failures {
        lines.push(format!(
            "{}{} ({}): {}",
            indent(1),
            failure.variant,
            failure.variant.label(),
            failure.error
        ));
    }
    lines
}

pub fn print_logo_load(load: &LogoLoad) {
    for line in format_logo_load(load) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of decoding the inputs without exporting.
pub fn format_check_report(report: &IngestReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.decoded.is_empty() {
        lines.push("Images".to_string());
        for (i, decoded) in report.decoded.iter().enumerate() {
            let dims = decoded.dimensions();
            lines.push(format!(
                "{} {} ({}x{})",
                format_index(i + 1),
                display_name(&file_name(&decoded.path)),
                dims.width,
                dims.height
            ));
            lines.push(format!("{}Source: {}", indent(1), decoded.path.display()));
        }
    }

    if !report.skipped.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(format_skipped(&report.skipped));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Found {}, skipped {}",
        count(report.decoded.len(), "image"),
        report.skipped.len()
    ));
    lines
}

/// Files that were found but could not be decoded.
pub fn format_skipped(skipped: &[Skipped]) -> Vec<String> {
    let mut lines = vec!["Skipped".to_string()];
    for s in skipped {
        lines.push(format!("{}{}: {}", indent(1), s.path.display(), s.reason));
    }
    lines
}

pub fn print_skipped(skipped: &[Skipped]) {
    if skipped.is_empty() {
        return;
    }
    for line in format_skipped(skipped) {
        println!("{}", line);
    }
}

/// Machine-readable form of a check report.
#[derive(Debug, Serialize)]
pub struct CheckManifest {
    pub images: Vec<CheckImage>,
    pub skipped: Vec<CheckSkipped>,
}

#[derive(Debug, Serialize)]
pub struct CheckImage {
    pub source: String,
    /// Output file name.
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct CheckSkipped {
    pub source: String,
    pub reason: String,
}

pub fn check_manifest(report: &IngestReport) -> CheckManifest {
    CheckManifest {
        images: report
            .decoded
            .iter()
            .map(|d| {
                let dims = d.dimensions();
                CheckImage {
                    source: d.path.display().to_string(),
                    name: display_name(&file_name(&d.path)),
                    width: dims.width,
                    height: dims.height,
                }
            })
            .collect(),
        skipped: report
            .skipped
            .iter()
            .map(|s| CheckSkipped {
                source: s.path.display().to_string(),
                reason: s.reason.clone(),
            })
            .collect(),
    }
}

pub fn print_check_report(report: &IngestReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::Started { total, directory } => {
            vec![format!(
                "Exporting {} → {}",
                count(*total, "image"),
                directory.display()
            )]
        }
        ExportEvent::Exported {
            index,
            path,
            width,
            height,
        } => vec![format!(
            "{}{} {} ({}x{})",
            indent(1),
            format_index(*index),
            file_name(path),
            width,
            height
        )],
        ExportEvent::Skipped { index, name, logo } => vec![format!(
            "{}{} {}: skipped, logo {} not loaded",
            indent(1),
            format_index(*index),
            name,
            logo
        )],
        ExportEvent::Finished { exported, skipped } => vec![format!(
            "Exported {}, skipped {}",
            count(*exported, "image"),
            skipped
        )],
    }
}

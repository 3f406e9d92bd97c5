//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! # Output Format
//!
//! ## Identify
//!
//! ```text
//! photos/dawn.png
//!     Dimensions: 4000x3000
//!     Source format: png
//!     Alpha possible: yes
//!     Content-optimized format: png
//! ```
//!
//! ## Convert
//!
//! ```text
//! photos/dawn.png → out/dawn.jpg
//!     4000x3000 → 800x600 (jpg)
//! ```
//!
//! ## Batch
//!
//! ```text
//! album/dawn.jpg → 800x600 webp
//! album/broken.jpg → FAILED: Failed to decode …
//!
//! Rendered 1 image, 1 failed
//! ```

use crate::batch::BatchSummary;
use crate::imaging::{Dimensions, ImageSummary, RenditionReport};
use std::path::Path;

fn dims(d: Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Lines describing one identified image.
pub fn format_identify(path: &Path, summary: &ImageSummary) -> Vec<String> {
    vec![
        path.display().to_string(),
        format!(
            "    Dimensions: {}",
            dims(Dimensions {
                width: summary.width,
                height: summary.height
            })
        ),
        format!(
            "    Source format: {}",
            summary.source_format.as_deref().unwrap_or("unknown")
        ),
        format!("    Alpha possible: {}", yes_no(summary.alpha_possible)),
        format!(
            "    Content-optimized format: {}",
            summary.content_optimized_format
        ),
    ]
}

pub fn print_identify(path: &Path, summary: &ImageSummary) {
    for line in format_identify(path, summary) {
        println!("{line}");
    }
}

/// Lines describing one rendition.
pub fn format_rendition(source: &Path, output: &Path, report: &RenditionReport) -> Vec<String> {
    let size = if report.resized {
        format!("{} → {}", dims(report.source), dims(report.output))
    } else {
        dims(report.output)
    };
    vec![
        format!("{} → {}", source.display(), output.display()),
        format!("    {size} ({})", report.format),
    ]
}

pub fn print_rendition(source: &Path, output: &Path, report: &RenditionReport) {
    for line in format_rendition(source, output, report) {
        println!("{line}");
    }
}

/// One line per file (paths relative to `input_dir`), then a totals line.
pub fn format_batch(summary: &BatchSummary, input_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .outcomes
        .iter()
        .map(|outcome| {
            let rel = outcome
                .source
                .strip_prefix(input_dir)
                .unwrap_or(&outcome.source);
            match &outcome.result {
                Ok(report) => format!(
                    "{} → {} {}",
                    rel.display(),
                    dims(report.output),
                    report.format
                ),
                Err(e) => format!("{} → FAILED: {e}", rel.display()),
            }
        })
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let mut totals = format!("Rendered {}", plural(summary.succeeded(), "image"));
    if summary.failed() > 0 {
        totals.push_str(&format!(", {} failed", summary.failed()));
    }
    lines.push(totals);
    lines
}

pub fn print_batch(summary: &BatchSummary, input_dir: &Path) {
    for line in format_batch(summary, input_dir) {
        println!("{line}");
    }
}

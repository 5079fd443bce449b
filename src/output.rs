//! CLI output formatting.
//!
//! # Entity Display Contract
//!
//! Every upload is shown the same way in every command: a 3-digit 1-based
//! positional index followed by its upload name, with details on indented
//! context lines.
//!
//! ## List
//!
//! ```text
//! Uploads (3)
//! 001 beach.png
//!     1600x1200, 2.1 MB
//! 002 dusk.jpg
//!     invalid: Decode failed: unrecognized image container
//! ```
//!
//! ## Export progress
//!
//! ```text
//! Exporting 3 images
//! [ 33%] 001 beach.png → c005.jpg
//! [ 67%] 002 dusk.jpg → c006.jpg
//! [100%] 003 pier.webp → c007.jpg
//! Done: 3 images → 20260307.zip
//! ```
//!
//! ## Preview
//!
//! ```text
//! 001 beach.png → 1200x628 jpg
//! 002 broken.png
//!     error: Decode failed: ...
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability;
//! [`print_lines`] writes the result to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::archive::ArchiveEvent;
use crate::collection::UploadCollection;
use crate::imaging::{Dimensions, SizePreset};
use crate::preview::PreviewOutcome;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count.
fn format_size(len: usize) -> String {
    const KB: f64 = 1024.0;
    let len = len as f64;
    if len < KB {
        format!("{} B", len)
    } else if len < KB * KB {
        format!("{:.1} KB", len / KB)
    } else {
        format!("{:.1} MB", len / (KB * KB))
    }
}

// ============================================================================
// List
// ============================================================================

/// Format the collection, one entity per upload.
///
/// `identify` is called per entry; failures are shown inline rather than
/// aborting the listing.
pub fn format_collection<E: std::fmt::Display>(
    collection: &UploadCollection,
    identify: impl Fn(&[u8]) -> Result<Dimensions, E>,
) -> Vec<String> {
    let mut lines = vec![format!("Uploads ({})", collection.len())];
    for (i, entry) in collection.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.name()));
        let detail = match identify(entry.bytes()) {
            Ok(d) => format!(
                "{}x{}, {}",
                d.width,
                d.height,
                format_size(entry.bytes().len())
            ),
            Err(e) => format!("invalid: {}", e),
        };
        lines.push(format!("{}{}", indent(1), detail));
    }
    lines
}

/// Format the list of size presets.
pub fn format_sizes() -> Vec<String> {
    SizePreset::ALL
        .iter()
        .map(|p| {
            let spec = p.spec();
            format!(
                "{:<7} {:>9}  prefix {:<2} {}",
                p.key(),
                p.to_string(),
                spec.prefix,
                p.description()
            )
        })
        .collect()
}

// ============================================================================
// Export
// ============================================================================

/// Format a single archive progress event as display lines.
pub fn format_archive_event(event: &ArchiveEvent) -> Vec<String> {
    match event {
        ArchiveEvent::Started { total } => {
            vec![format!("Exporting {} images", total)]
        }
        ArchiveEvent::EntryWritten {
            processed,
            source_name,
            filename,
            ..
        } => {
            let percent = (event.fraction() * 100.0).round() as u32;
            vec![format!(
                "[{:>3}%] {} {} \u{2192} {}",
                percent,
                format_index(*processed),
                source_name,
                filename
            )]
        }
    }
}

/// Final line after an export.
pub fn format_export_summary(count: usize, archive_name: &str) -> String {
    format!("Done: {} images \u{2192} {}", count, archive_name)
}

// ============================================================================
// Preview
// ============================================================================

/// Format preview outcomes; failed entries get an indented error line.
pub fn format_preview_outcomes(outcomes: &[PreviewOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in outcomes {
        let header = format!("{} {}", format_index(outcome.index + 1), outcome.name);
        match &outcome.result {
            Ok(t) => lines.push(format!(
                "{} \u{2192} {}x{} {}",
                header,
                t.width,
                t.height,
                t.format.extension()
            )),
            Err(e) => {
                lines.push(header);
                lines.push(format!("{}error: {}", indent(1), e.cause));
            }
        }
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

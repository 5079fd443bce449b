//! Batch export into a single zip archive.
//!
//! [`build`] walks the collection in order, runs every entry through the
//! transform pipeline, and writes each result into an in-memory zip:
//!
//! ```text
//! for (i, entry) in collection:
//!     bytes = pipeline(entry, size, sharpen)
//!     name  = sequenced(prefix, start, i)   or   entry.name
//!     zip.write(name, bytes)
//!     progress(i + 1 / total)
//! ```
//!
//! ## Failure Policy
//!
//! The archive is all-or-nothing. The first entry that fails to transform
//! aborts the build with an [`ArchiveError::Transform`] naming that entry,
//! and everything written so far is dropped. An empty collection is not an
//! error: it produces a valid archive with zero entries.
//!
//! ## Determinism
//!
//! Entries are Deflate-compressed, flat (no directories), in collection
//! order, with a fixed 1980-01-01 timestamp. The same collection and
//! configuration always produce byte-identical archives.
//!
//! Entry names are unique. Original names are flattened (`/` and `\`
//! become `_`), and a flattened name that is already taken gets a `-2`,
//! `-3`, ... suffix before its extension.
//!
//! ## Progress
//!
//! Like the rest of the pipeline, progress is reported through an optional
//! channel: one [`ArchiveEvent::Started`] followed by one
//! [`ArchiveEvent::EntryWritten`] per entry. The build cannot be cancelled
//! once started.

use crate::collection::{UploadCollection, UploadEntry};
use crate::config::{ExportConfig, ExportNaming};
use crate::imaging::{self, ImageBackend, RustBackend, TransformError};
use crate::naming;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::mpsc::Sender;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Export aborted, {0}")]
    Transform(#[from] TransformError),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress events sent while an archive is being built.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveEvent {
    Started {
        total: usize,
    },
    EntryWritten {
        /// 1-based count of entries written so far.
        processed: usize,
        total: usize,
        source_name: String,
        filename: String,
        width: u32,
        height: u32,
    },
}

impl ArchiveEvent {
    /// Fraction of the build completed after this event, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        match self {
            ArchiveEvent::Started { total: 0 } => 1.0,
            ArchiveEvent::Started { .. } => 0.0,
            ArchiveEvent::EntryWritten {
                processed, total, ..
            } => *processed as f64 / *total as f64,
        }
    }
}

/// One file written into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedFile {
    pub filename: String,
    pub source_name: String,
    pub width: u32,
    pub height: u32,
    /// Encoded size in bytes, before zip compression.
    pub len: usize,
}

/// A finished archive.
#[derive(Debug, Clone)]
pub struct Archive {
    pub bytes: Vec<u8>,
    pub files: Vec<ArchivedFile>,
}

/// Name under which the entry at `position` is stored.
pub fn archive_entry_name(
    naming: ExportNaming,
    prefix: &str,
    position: usize,
    entry: &UploadEntry,
) -> String {
    match naming {
        ExportNaming::Sequenced { start } => naming::name_for(prefix, start, position),
        // Keep the archive flat even if a caller hands us a path-like name.
        ExportNaming::Original => entry.name().replace(['/', '\\'], "_"),
    }
}

/// Make `name` unique among `taken` by appending `-2`, `-3`, ... to its stem.
///
/// Flattening can map distinct upload names onto one entry name
/// (`dir/x.png` and `dir_x.png`); later entries get the suffix.
fn unique_entry_name(name: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name.as_str(), ""),
    };
    (2u64..)
        .map(|n| format!("{stem}-{n}{ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.clone())
}

/// Build an archive with the production [`RustBackend`].
pub fn build(
    collection: &UploadCollection,
    config: &ExportConfig,
    progress: Option<Sender<ArchiveEvent>>,
) -> Result<Archive, ArchiveError> {
    build_with_backend(&RustBackend::new(), collection, config, progress)
}

/// Build an archive using a specific backend (allows testing with mock).
pub fn build_with_backend(
    backend: &impl ImageBackend,
    collection: &UploadCollection,
    config: &ExportConfig,
    progress: Option<Sender<ArchiveEvent>>,
) -> Result<Archive, ArchiveError> {
    let total = collection.len();
    let params = config.transform_params();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let send = |event: ArchiveEvent| {
        if let Some(tx) = &progress {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(event);
        }
    };

    send(ArchiveEvent::Started { total });

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut files = Vec::with_capacity(total);
    let mut taken = HashSet::with_capacity(total);

    for (position, entry) in collection.iter().enumerate() {
        let output = imaging::run(backend, entry, &params)?;
        let filename = unique_entry_name(
            archive_entry_name(config.naming, config.size.prefix, position, entry),
            &taken,
        );
        taken.insert(filename.clone());

        writer.start_file(filename.as_str(), options)?;
        writer.write_all(&output.bytes)?;

        tracing::debug!(
            source = %entry.name(),
            filename = %filename,
            len = output.bytes.len(),
            "Archived entry"
        );

        send(ArchiveEvent::EntryWritten {
            processed: position + 1,
            total,
            source_name: entry.name().to_string(),
            filename: filename.clone(),
            width: output.width,
            height: output.height,
        });

        files.push(ArchivedFile {
            filename,
            source_name: entry.name().to_string(),
            width: output.width,
            height: output.height,
            len: output.bytes.len(),
        });
    }

    let bytes = writer.finish()?.into_inner();
    tracing::info!(entries = files.len(), archive_len = bytes.len(), "Archive built");
    Ok(Archive { bytes, files })
}

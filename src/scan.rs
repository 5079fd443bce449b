//! Reading uploads from the filesystem.
//!
//! The CLI stands in for an upload form: every path given on the command line
//! becomes one or more [`UploadEntry`] values, in argument order.
//!
//! - **Files** are taken as-is, whatever their extension. If the bytes are
//!   not a supported image, the pipeline reports it for that entry.
//! - **Directories** are walked recursively in filename order, keeping only
//!   files with a supported image extension (case-insensitive).
//!
//! Entries are named by their bare filename, not their path, matching what a
//! browser upload would report. Two files with the same name in different
//! directories therefore collide, and the collection keeps the first.

use crate::collection::UploadEntry;
use crate::imaging::supported_input_extensions;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input not found: {0}")]
    NotFound(PathBuf),
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Expand inputs into the ordered list of image files they refer to.
pub fn collect_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            return Err(ScanError::NotFound(input.clone()));
        }
    }
    Ok(paths)
}

/// Read every input into an upload entry.
pub fn read_uploads(inputs: &[PathBuf]) -> Result<Vec<UploadEntry>, ScanError> {
    collect_paths(inputs)?
        .into_iter()
        .map(|path| -> Result<UploadEntry, ScanError> {
            let bytes = fs::read(&path)?;
            tracing::debug!(path = %path.display(), len = bytes.len(), "Read upload");
            Ok(UploadEntry::new(upload_name(&path), bytes))
        })
        .collect()
}

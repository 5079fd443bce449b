//! High-level image operations.
//!
//! These functions bind an upload entry to a backend call and attach the
//! entry's name to whatever goes wrong, so callers (preview, archive) can
//! report failures per image.

use super::backend::{BackendError, ImageBackend, Transformed};
use super::params::TransformParams;
use crate::collection::UploadEntry;
use thiserror::Error;

/// A pipeline stage failed for one entry.
#[derive(Error, Debug)]
#[error("{entry_name}: {cause}")]
pub struct TransformError {
    pub entry_name: String,
    #[source]
    pub cause: BackendError,
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Run one entry through the transform pipeline.
pub fn run(
    backend: &impl ImageBackend,
    entry: &UploadEntry,
    params: &TransformParams,
) -> Result<Transformed> {
    tracing::debug!(
        entry = %entry.name(),
        input_len = entry.bytes().len(),
        width = params.size.width,
        height = params.size.height,
        sharpen = params.sharpen,
        "Transforming"
    );
    backend
        .transform(entry.bytes(), params)
        .map_err(|cause| TransformError {
            entry_name: entry.name().to_string(),
            cause,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::params::{OutputPolicy, SizePreset};

    fn params() -> TransformParams {
        TransformParams {
            size: SizePreset::Blog.spec(),
            sharpen: false,
            output: OutputPolicy::PreserveSource,
        }
    }

    #[test]
    fn run_passes_entry_bytes_and_params() {
        let backend = MockBackend::new();
        let entry = UploadEntry::new("a.png", b"AAA".to_vec());

        let out = run(&backend, &entry, &params()).unwrap();
        assert_eq!(out.bytes, b"AAA");

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Transform {
                input: b"AAA".to_vec(),
                width: 600,
                height: 400,
                sharpen: false,
                output: OutputPolicy::PreserveSource,
            }]
        );
    }

    #[test]
    fn run_names_the_failing_entry() {
        let backend = MockBackend::failing_on(&[b"bad"]);
        let entry = UploadEntry::new("broken.jpg", b"bad".to_vec());

        let err = run(&backend, &entry, &params()).unwrap_err();
        assert_eq!(err.entry_name, "broken.jpg");
        assert!(matches!(err.cause, BackendError::Decode(_)));
        assert!(err.to_string().starts_with("broken.jpg: Decode failed"));
    }
}

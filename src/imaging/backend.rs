//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and transform. Both work on in-memory byte buffers.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the [`MockBackend`](tests::MockBackend) to exercise
//! archive and preview logic without encoding real images.

use super::codec::ImageKind;
use super::params::TransformParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Invalid target size {width}x{height}: both dimensions must be positive")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Encoded output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageKind,
}

/// Trait for image processing backends.
///
/// `Sync` so independent entries can be transformed from a rayon pool.
pub trait ImageBackend: Sync {
    /// Read image dimensions without running the pipeline.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, normalize, optionally sharpen, fit to size, and re-encode.
    fn transform(&self, bytes: &[u8], params: &TransformParams)
    -> Result<Transformed, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{OutputPolicy, SizePreset};
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// `transform` echoes the input bytes back as the "encoded" output, so
    /// callers can check which source ended up where. Inputs listed in
    /// `failing_inputs` produce a decode error.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub failing_inputs: Vec<Vec<u8>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Transform {
            input: Vec<u8>,
            width: u32,
            height: u32,
            sharpen: bool,
            output: OutputPolicy,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        pub fn failing_on(inputs: &[&[u8]]) -> Self {
            Self {
                failing_inputs: inputs.iter().map(|i| i.to_vec()).collect(),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(bytes.len()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))
        }

        fn transform(
            &self,
            bytes: &[u8],
            params: &TransformParams,
        ) -> Result<Transformed, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Transform {
                input: bytes.to_vec(),
                width: params.size.width,
                height: params.size.height,
                sharpen: params.sharpen,
                output: params.output,
            });

            if self.failing_inputs.iter().any(|f| f.as_slice() == bytes) {
                return Err(BackendError::Decode("mock: unreadable input".to_string()));
            }

            let format = match params.output {
                OutputPolicy::ForceJpeg => ImageKind::Jpeg,
                OutputPolicy::PreserveSource => ImageKind::Png,
            };
            Ok(Transformed {
                bytes: bytes.to_vec(),
                width: params.size.width,
                height: params.size.height,
                format,
            })
        }
    }

    fn web_params() -> TransformParams {
        TransformParams {
            size: SizePreset::Web.spec(),
            sharpen: true,
            output: OutputPolicy::ForceJpeg,
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(b"abc").unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Identify(3)]);
    }

    #[test]
    fn mock_records_transform() {
        let backend = MockBackend::new();

        let out = backend.transform(b"pixels", &web_params()).unwrap();
        assert_eq!(out.bytes, b"pixels");
        assert_eq!((out.width, out.height), (1200, 628));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Transform {
                width: 1200,
                height: 628,
                sharpen: true,
                output: OutputPolicy::ForceJpeg,
                ..
            }
        ));
    }

    #[test]
    fn mock_fails_on_listed_input() {
        let backend = MockBackend::failing_on(&[b"bad"]);
        assert!(backend.transform(b"good", &web_params()).is_ok());
        let err = backend.transform(b"bad", &web_params()).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}

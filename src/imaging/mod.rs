//! Image processing: pure Rust, in-memory.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Decode / encode** | `image` codecs (JPEG, PNG, WebP) |
//! | **Sharpen** | fixed 3×3 Laplacian kernel |
//! | **Fit** | center crop to target aspect + Lanczos3 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fill/crop math (unit testable)
//! - **Parameters**: Data structures describing a transform
//! - **Codec / Sharpen / Resize**: the individual pixel stages
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Runs an upload entry through a backend

pub mod backend;
mod calculations;
pub mod codec;
pub mod operations;
mod params;
pub mod resize;
pub mod rust_backend;
pub mod sharpen;

pub use backend::{BackendError, Dimensions, ImageBackend, Transformed};
pub use calculations::{CropWindow, calculate_crop_window};
pub use codec::{ImageKind, supported_input_extensions};
pub use operations::{TransformError, run};
pub use params::{OutputPolicy, Quality, SizePreset, SizeSpec, TransformParams};
pub use rust_backend::RustBackend;

//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::load_from_memory_with_format` |
//! | Color normalization | [`codec::normalize_color`] (alpha over white) |
//! | Sharpening | [`sharpen::apply`] (3×3 Laplacian kernel) |
//! | Center crop + fill | `crop_imm` + `image::imageops::resize` (`Lanczos3`) |
//! | Encode | `image` JPEG / PNG / lossless WebP encoders |
//!
//! The stage order is fixed: decode → normalize → sharpen → fit → encode.
//! Normalizing first means the kernel only ever sees opaque RGB, and
//! sharpening before the downscale compensates for Lanczos softening.

use super::backend::{BackendError, Dimensions, ImageBackend, Transformed};
use super::codec::{self, ImageKind};
use super::params::{OutputPolicy, Quality, TransformParams};
use super::{resize, sharpen};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        codec::dimensions(bytes)
    }

    fn transform(
        &self,
        bytes: &[u8],
        params: &TransformParams,
    ) -> Result<Transformed, BackendError> {
        let decoded = codec::decode(bytes)?;
        let source_kind = decoded.kind;
        let rgb = codec::normalize_color(decoded.image);
        let rgb = sharpen::sharpen_if(rgb, params.sharpen);
        let fitted = resize::fit(&rgb, params.size.width, params.size.height)?;

        let format = match params.output {
            OutputPolicy::ForceJpeg => ImageKind::Jpeg,
            OutputPolicy::PreserveSource => source_kind,
        };
        let bytes = codec::encode(&fitted, format, Quality::max())?;

        Ok(Transformed {
            bytes,
            width: fitted.width(),
            height: fitted.height(),
            format,
        })
    }
}

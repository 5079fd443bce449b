//! Decode, color-normalize, and re-encode in-memory images.
//!
//! Only three containers are accepted: PNG, JPEG and WebP. The container is
//! sniffed from the leading bytes, never from a filename, so a mislabelled
//! upload still decodes (or fails) on its actual contents.
//!
//! ## Color normalization
//!
//! Every decoded buffer is flattened to 8-bit RGB before any pixel work:
//!
//! - Buffers with an alpha channel are composited over opaque white, using
//!   alpha as the blend mask.
//! - Indexed (palette) PNGs are expanded by the decoder, so they arrive here
//!   as RGB or RGBA and take one of the two paths above.
//! - Everything else (grayscale, 16-bit, RGB) is converted directly.
//!
//! The sharpening kernel and the JPEG encoder both require this 3-channel form.

use super::backend::{BackendError, Dimensions};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::LazyLock;

/// Containers the pipeline can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    WebP,
}

impl ImageKind {
    pub fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::WebP => Some(ImageKind::WebP),
            _ => None,
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::WebP => ImageFormat::WebP,
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::WebP => "webp",
        }
    }
}

const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// A decoded image together with the container it came from.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub image: DynamicImage,
    pub kind: ImageKind,
}

fn sniff(bytes: &[u8]) -> Result<ImageKind, BackendError> {
    let format = image::guess_format(bytes)
        .map_err(|e| BackendError::Decode(format!("unrecognized image container: {e}")))?;
    ImageKind::from_format(format)
        .ok_or_else(|| BackendError::Decode(format!("unsupported image format: {format:?}")))
}

/// Decode raw bytes, remembering the detected container.
pub fn decode(bytes: &[u8]) -> Result<Decoded, BackendError> {
    let kind = sniff(bytes)?;
    let image = image::load_from_memory_with_format(bytes, kind.format())
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(BackendError::Decode("image has zero width or height".into()));
    }
    Ok(Decoded { image, kind })
}

/// Read dimensions from the container header without decoding pixels.
pub fn dimensions(bytes: &[u8]) -> Result<Dimensions, BackendError> {
    sniff(bytes)?;
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(Dimensions { width, height })
}

#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((channel as u32 * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Flatten any decoded buffer to opaque 8-bit RGB.
pub fn normalize_color(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }
    let rgba = image.into_rgba8();
    let (w, h) = rgba.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

/// Encode an RGB buffer into the given container.
///
/// `quality` only applies to JPEG. The JPEG encoder writes every component
/// at full resolution (4:4:4), so no chroma subsampling is applied. WebP is
/// written lossless.
pub fn encode(image: &RgbImage, kind: ImageKind, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let (w, h) = image.dimensions();
    let mut buf = Vec::new();
    let result = match kind {
        ImageKind::Jpeg => JpegEncoder::new_with_quality(&mut buf, quality.value() as u8)
            .write_image(image.as_raw(), w, h, ExtendedColorType::Rgb8),
        ImageKind::Png => {
            PngEncoder::new(&mut buf).write_image(image.as_raw(), w, h, ExtendedColorType::Rgb8)
        }
        ImageKind::WebP => WebPEncoder::new_lossless(&mut buf).write_image(
            image.as_raw(),
            w,
            h,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| BackendError::Encode(format!("{} encode failed: {e}", kind.extension())))?;
    Ok(buf)
}

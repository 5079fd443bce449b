//! Fill-and-crop resizing to an exact output box.
//!
//! The largest centered region of the source that has the target's aspect
//! ratio is cut out first, then resampled (Lanczos3) straight to the box.
//! The output is always exactly the requested size; parts of the source
//! outside the target aspect ratio are discarded, never letterboxed.
//!
//! Cropping before resampling keeps memory bounded by the source and the
//! target box. A 2x2000 strip fitted to 1200x628 resamples a 2x1 window
//! instead of a 1200x1200000 intermediate.

use super::backend::BackendError;
use super::calculations::calculate_crop_window;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Center-crop `image` to the aspect ratio of `width`×`height`, then scale to
/// exactly that size.
pub fn fit(image: &RgbImage, width: u32, height: u32) -> Result<RgbImage, BackendError> {
    if width == 0 || height == 0 {
        return Err(BackendError::InvalidSize { width, height });
    }
    let source = image.dimensions();
    if source.0 == 0 || source.1 == 0 {
        return Err(BackendError::Decode("cannot resize an empty image".into()));
    }

    let window = calculate_crop_window(source, (width, height));
    let region = imageops::crop_imm(image, window.x, window.y, window.width, window.height);

    if (window.width, window.height) == (width, height) {
        return Ok(region.to_image());
    }
    Ok(imageops::resize(&*region, width, height, FilterType::Lanczos3))
}

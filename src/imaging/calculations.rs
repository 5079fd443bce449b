//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered region of `source` with the aspect ratio of `target`.
///
/// The window always spans the full source along one axis; the other axis is
/// trimmed evenly from both sides, with an odd leftover pixel going to the
/// far side. Scaling this window to `target` gives the same framing as
/// "scale to cover, then center-crop", while the resampler never has to
/// allocate more than the target box.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height), both non-zero
/// * `target` - Target area dimensions (width, height), both non-zero
///
/// # Examples
/// ```
/// # use fitpack::imaging::{calculate_crop_window, CropWindow};
/// // 4:3 source into a square box: keep the middle 600x600
/// assert_eq!(
///     calculate_crop_window((800, 600), (300, 300)),
///     CropWindow { x: 100, y: 0, width: 600, height: 600 }
/// );
/// ```
pub fn calculate_crop_window(source: (u32, u32), target: (u32, u32)) -> CropWindow {
    let (src_w, src_h) = (source.0 as u64, source.1 as u64);
    let (tgt_w, tgt_h) = (target.0 as u64, target.1 as u64);

    // Integer cross-multiplication: wider than target means height is kept.
    let (width, height) = if src_w * tgt_h > src_h * tgt_w {
        let w = (src_h * tgt_w + tgt_h / 2) / tgt_h;
        (w.clamp(1, src_w), src_h)
    } else {
        let h = (src_w * tgt_h + tgt_w / 2) / tgt_w;
        (src_w, h.clamp(1, src_h))
    };

    CropWindow {
        x: ((src_w - width) / 2) as u32,
        y: ((src_h - height) / 2) as u32,
        width: width as u32,
        height: height as u32,
    }
}

//! Global (Otsu) binarization into an ink mask.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;

use crate::error::{RasterError, ensure_non_empty};

/// Foreground value in every mask produced by this crate.
pub const INK: u8 = 255;

/// Images whose darkest and lightest pixels differ by less than this are
/// treated as blank.
const MIN_CONTRAST: u8 = 16;

/// Convert any rendered image to 8-bit grayscale.
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Binarize `gray` with Otsu's threshold, inverted so that dark ink becomes
/// [`INK`] and paper becomes 0.
///
/// A blank or near-uniform image yields an all-zero mask rather than a
/// threshold that splits noise.
pub fn ink_mask(gray: &GrayImage) -> Result<GrayImage, RasterError> {
    ensure_non_empty(gray.width(), gray.height())?;

    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if hi - lo < MIN_CONTRAST {
        return Ok(GrayImage::new(gray.width(), gray.height()));
    }

    let level = otsu_level(gray);
    let mut mask = GrayImage::new(gray.width(), gray.height());
    for (x, y, p) in gray.enumerate_pixels() {
        if p[0] <= level {
            mask.put_pixel(x, y, Luma([INK]));
        }
    }
    Ok(mask)
}

/// Number of ink pixels in `mask`.
pub fn ink_count(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p[0] == INK).count() as u64
}

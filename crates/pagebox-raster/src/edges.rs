//! Edge maps for frame detection.
//!
//! Smoothing → Canny → short dilation → larger closing. The closing bridges
//! gaps in broken or faint scanned borders so that a frame comes out as one
//! contour.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::median_filter;
use imageproc::morphology::{close, dilate};

use crate::error::{RasterError, ensure_non_empty};

/// Parameters of [`edge_map`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeOptions {
    /// Radius of the edge-preserving median filter; 0 disables it.
    pub smooth_radius: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Chebyshev radius of the dilation step.
    pub dilate_radius: u8,
    /// Chebyshev radius of the closing step.
    pub close_radius: u8,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            smooth_radius: 2,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_radius: 1,
            close_radius: 3,
        }
    }
}

/// Binary edge map of `gray` (edges are 255).
pub fn edge_map(gray: &GrayImage, options: &EdgeOptions) -> Result<GrayImage, RasterError> {
    ensure_non_empty(gray.width(), gray.height())?;
    let smoothed;
    let source = if options.smooth_radius > 0 {
        smoothed = median_filter(gray, options.smooth_radius, options.smooth_radius);
        &smoothed
    } else {
        gray
    };
    let edges = canny(source, options.canny_low, options.canny_high);
    let mut out = edges;
    if options.dilate_radius > 0 {
        out = dilate(&out, Norm::LInf, options.dilate_radius);
    }
    if options.close_radius > 0 {
        out = close(&out, Norm::LInf, options.close_radius);
    }
    Ok(out)
}

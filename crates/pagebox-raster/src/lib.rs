//! pagebox-raster: raster analysis primitives over `image`/`imageproc`.
//!
//! Everything works in pixel space on 8-bit grayscale images. Masks use
//! [`INK`] (255) for foreground and 0 for background.

pub mod binarize;
pub mod components;
pub mod contours;
pub mod edges;
pub mod error;
pub mod projection;
pub mod segments;
pub mod shapes;

pub use binarize::{INK, ink_count, ink_mask, to_gray};
pub use components::{Component, components};
pub use contours::{bounding_boxes, outer_contours, rotated_boxes};
pub use edges::{EdgeOptions, edge_map};
pub use error::RasterError;
pub use projection::{
    Run, column_profile, dominant_run, first_above, merge_runs, row_profile, runs_above,
};
pub use segments::{Segment, SegmentOptions, horizontal_segments};
pub use shapes::{PixelRect, RotatedBox, min_area_rect};

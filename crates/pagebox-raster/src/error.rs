//! Error types for raster analysis.

use thiserror::Error;

/// Error returned when an image cannot be analysed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The image has zero width or height.
    #[error("image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// The image carries no usable signal (no contrast, no ink).
    #[error("degenerate raster: {0}")]
    Degenerate(String),
}

/// Reject zero-sized images before any processing.
pub(crate) fn ensure_non_empty(width: u32, height: u32) -> Result<(), RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::EmptyImage { width, height });
    }
    Ok(())
}

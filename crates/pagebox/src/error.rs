//! Error type for the detection agents.
//!
//! Every agent has a `try_*` method returning `Result<_, DetectError>` and a
//! best-effort method that logs the error and returns the empty result.
//! "Ran and found nothing" is never an error: it is `Ok(vec![])` or
//! `Ok(None)`.

use pagebox_parse::BackendError;
use pagebox_raster::RasterError;
use thiserror::Error;

use crate::ocr::OcrError;
use crate::render::RenderError;
use crate::structure::StructureError;

/// Why a detection produced no result.
#[derive(Debug, Error)]
pub enum DetectError {
    /// A collaborator (OCR engine, structure engine) is not installed or
    /// not configured.
    #[error("{0} is not available")]
    Unavailable(String),

    /// The requested region was rejected before any rendering.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl DetectError {
    /// `true` when the failure is a missing collaborator rather than a
    /// failed run.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DetectError::Unavailable(_))
            || matches!(self, DetectError::Render(RenderError::Unavailable(_)))
            || matches!(self, DetectError::Ocr(OcrError::Unavailable))
    }
}

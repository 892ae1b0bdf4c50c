//! pagebox: locate tables, figures and equation numbers on document pages.
//!
//! Every agent works on a [`PageContext`] and reports boxes in top-left page
//! points. Rendering, OCR and document-structure conversion are reached
//! through the [`PageRenderer`], [`OcrEngine`] and [`StructureEngine`]
//! traits, so each agent degrades to an empty (or unchanged) result when an
//! external tool is missing.
//!
//! # Example
//!
//! ```no_run
//! use pagebox::{FrameBoxDetector, FrameKind, LopdfDocument, PageContext, AcquireOptions};
//!
//! let doc = LopdfDocument::open_file("paper.pdf")?;
//! let page = doc.page(0)?;
//! let ctx = PageContext::acquire(&page, &AcquireOptions::default())?;
//! let frames = FrameBoxDetector::default().vector_candidates(&ctx, None, None, FrameKind::Table);
//! for frame in frames {
//!     println!("{:?} score={}", frame.bbox, frame.score);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anchor;
pub mod config;
pub mod error;
pub mod frame;
pub mod ocr;
#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod region;
pub mod render;
pub mod structure;
pub mod tesseract;
pub mod tighten;

pub use anchor::{AnchorOptions, EquationAnchorAgent, TEXT_LAYER_ENGINE, select_anchor};
pub use config::{CONFIG_FILE_NAME, ConfigError, OcrConfig, PageboxConfig};
pub use error::DetectError;
pub use frame::{FrameBoxDetector, FrameOptions, caption_gate};
pub use ocr::{OcrEngine, OcrError, OcrToken, SegmentationMode};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRenderer;
pub use region::{RegionConversionBridge, RegionOptions};
pub use render::{PageRenderer, RenderError, RenderedClip, pixel_size, scale_for};
pub use structure::{
    CommandStructureEngine, StructureEngine, StructureError, SyntheticDocument, envelope,
    extract_cell_boxes,
};
pub use tesseract::{TESSERACT_ENV, TesseractEngine, locate_tesseract, parse_tsv};
pub use tighten::{RasterTightener, TightenOptions};

pub use pagebox_core::{
    AcquireOptions, AnchorToken, BBox, BottomLeftBox, Column, ColumnBand, DetectionCandidate,
    DetectionSource, FrameKind, PageContext, PageError, PageSource, to_bottom_left, to_top_left,
};
pub use pagebox_parse::{BackendError, LopdfDocument, LopdfPage};

pub use pagebox_core;
pub use pagebox_parse;
pub use pagebox_raster;

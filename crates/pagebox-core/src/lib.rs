//! pagebox-core: Backend-independent data types for page-object localization.
//!
//! This crate provides the foundational types (BBox, paths, rects, the
//! per-page acquisition context, detection results) and the coordinate
//! bridge between top-left page points and bottom-left engine space.
//! It does no rendering, OCR or PDF parsing.

pub mod candidate;
pub mod context;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod path;
pub mod shapes;

pub use candidate::{
    AnchorToken, Column, ColumnBand, DetectionCandidate, DetectionSource, FrameKind,
    is_anchor_text, sort_candidates,
};
pub use context::{AcquireOptions, ObjectHint, PageContext, PageSource, RawHint, TextRun, Word};
pub use coords::{BottomLeftBox, to_bottom_left, to_top_left};
pub use error::{AcquireField, AcquireWarning, PageError};
pub use geometry::{BBox, Ctm, Point};
pub use path::{Path, PathBuilder, PathSegment};
pub use shapes::{Rect, rects_from_paths};

//! Result types returned by the detectors.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::geometry::BBox;

/// What kind of framed object the caller is looking for.
///
/// The kind only selects the caption-gating rule; it is decided by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FrameKind {
    /// Caption sits inside the frame, near its top.
    Table,
    /// Caption sits below the frame.
    Figure,
}

/// Which tier produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DetectionSource {
    Vector,
    Raster,
}

/// A frame candidate with its provenance and ranking score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionCandidate {
    pub bbox: BBox,
    pub source: DetectionSource,
    pub score: f64,
}

/// Sort candidates best first. The sort is stable, so equal scores keep
/// their discovery order.
pub fn sort_candidates(candidates: &mut [DetectionCandidate]) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

static ANCHOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{1,3}[a-z]?\)$").expect("anchor pattern is valid"));

/// `true` if `text` is exactly an equation number such as `(12)` or `(12a)`.
pub fn is_anchor_text(text: &str) -> bool {
    ANCHOR_PATTERN.is_match(text)
}

/// The equation-number token that pins an equation's right edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorToken {
    pub text: String,
    /// Token bounds in page points.
    pub bbox: BBox,
    /// Name of the engine that read the token (e.g. `"tesseract"`).
    pub engine: String,
    /// Recognition confidence in `[0, 100]`.
    pub confidence: f64,
}

/// Page column for corridor scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Column {
    Left,
    Right,
}

/// Horizontal extent `[x_left, x_right]` of a page column, in page points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnBand {
    pub x_left: f64,
    pub x_right: f64,
}

impl ColumnBand {
    pub fn new(x_left: f64, x_right: f64) -> Self {
        Self {
            x_left: x_left.min(x_right),
            x_right: x_left.max(x_right),
        }
    }

    pub fn width(&self) -> f64 {
        self.x_right - self.x_left
    }

    /// `true` when the box overlaps the band horizontally.
    pub fn overlaps(&self, bbox: &BBox) -> bool {
        bbox.x1 > self.x_left && bbox.x0 < self.x_right
    }
}

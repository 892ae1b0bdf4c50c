//! Per-page acquisition cache.
//!
//! A [`PageContext`] is built once from a [`PageSource`] and is read-only
//! afterwards. Every detector reads from it; none mutates it.

use tracing::debug;

use crate::candidate::FrameKind;
use crate::coords::{BottomLeftBox, to_top_left};
use crate::error::{AcquireField, AcquireWarning, PageError};
use crate::geometry::BBox;
use crate::path::Path;
use crate::shapes::{Rect, rects_from_paths};

/// A run of text as laid out on the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    pub text: String,
    /// Bounds in top-left page points.
    pub bbox: BBox,
    pub font_size: f64,
}

/// A whitespace-delimited word with its bounds in top-left page points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// A table/figure hint from an upstream engine, in bottom-left space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawHint {
    pub kind: FrameKind,
    pub bbox: BottomLeftBox,
}

/// A hint converted into this page's top-left point space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectHint {
    pub kind: FrameKind,
    pub bbox: BBox,
}

/// A handle to one page that can report its raw primitives.
///
/// Implementations may fail per field; [`PageContext::acquire`] turns each
/// failure into an empty collection. Optional fields default to empty.
pub trait PageSource {
    /// Page index (0-based).
    fn page_number(&self) -> usize;

    /// Page width and height in points.
    fn size(&self) -> Result<(f64, f64), PageError>;

    /// Vector drawings in bottom-left user space.
    fn drawings(&self) -> Result<Vec<Path>, PageError>;

    fn text_runs(&self) -> Result<Vec<TextRun>, PageError> {
        Ok(Vec::new())
    }

    fn words(&self) -> Result<Vec<Word>, PageError> {
        Ok(Vec::new())
    }

    fn hints(&self) -> Result<Vec<RawHint>, PageError> {
        Ok(Vec::new())
    }
}

/// Options controlling page acquisition.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcquireOptions {
    /// Explicit column-gutter x. `None` means half the page width.
    pub gutter_x: Option<f64>,
}

/// Raw geometry primitives for a single page, acquired once.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    page_number: usize,
    width: f64,
    height: f64,
    gutter_x: f64,
    text_runs: Vec<TextRun>,
    words: Vec<Word>,
    drawings: Vec<Path>,
    rects: Vec<Rect>,
    hints: Vec<ObjectHint>,
    warnings: Vec<AcquireWarning>,
}

impl PageContext {
    /// Acquire everything the detectors need from `source`.
    ///
    /// Only the page size is required; any other field that fails degrades
    /// to an empty collection and leaves an [`AcquireWarning`].
    pub fn acquire<S>(source: &S, options: &AcquireOptions) -> Result<Self, PageError>
    where
        S: PageSource + ?Sized,
    {
        let page_number = source.page_number();
        let (width, height) = source.size()?;
        if !(width > 0.0 && height > 0.0) {
            return Err(PageError::Geometry(format!(
                "page {page_number} has non-positive size {width}x{height}"
            )));
        }

        let mut warnings = Vec::new();
        let text_runs = or_empty(
            source.text_runs(),
            AcquireField::TextRuns,
            page_number,
            &mut warnings,
        );
        let words = or_empty(source.words(), AcquireField::Words, page_number, &mut warnings);
        let drawings = or_empty(
            source.drawings(),
            AcquireField::Drawings,
            page_number,
            &mut warnings,
        );
        let raw_hints = or_empty(source.hints(), AcquireField::Hints, page_number, &mut warnings);

        let hints = raw_hints
            .into_iter()
            .map(|h| ObjectHint {
                kind: h.kind,
                bbox: to_top_left(h.bbox, height),
            })
            .collect();

        let mut ctx = Self::from_parts(page_number, width, height, drawings);
        if let Some(gutter) = options.gutter_x {
            ctx.gutter_x = gutter;
        }
        ctx.text_runs = text_runs;
        ctx.words = words;
        ctx.hints = hints;
        ctx.warnings = warnings;
        Ok(ctx)
    }

    /// Build a context directly from drawings, with no text and no hints.
    pub fn from_parts(page_number: usize, width: f64, height: f64, drawings: Vec<Path>) -> Self {
        let rects = rects_from_paths(&drawings, height);
        Self {
            page_number,
            width,
            height,
            gutter_x: width / 2.0,
            text_runs: Vec::new(),
            words: Vec::new(),
            drawings,
            rects,
            hints: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Replace the word list. Used by callers that acquire text elsewhere.
    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    /// Override the inferred column gutter.
    pub fn with_gutter(mut self, gutter_x: f64) -> Self {
        self.gutter_x = gutter_x;
        self
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The whole page as a box.
    pub fn page_box(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }

    /// X-coordinate of the gap between the two text columns.
    pub fn gutter_x(&self) -> f64 {
        self.gutter_x
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn drawings(&self) -> &[Path] {
        &self.drawings
    }

    /// Axis-aligned rectangles derived from [`drawings`](Self::drawings).
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn hints(&self) -> &[ObjectHint] {
        &self.hints
    }

    /// Fields that degraded to empty during acquisition.
    pub fn warnings(&self) -> &[AcquireWarning] {
        &self.warnings
    }
}

fn or_empty<T>(
    result: Result<Vec<T>, PageError>,
    field: AcquireField,
    page: usize,
    warnings: &mut Vec<AcquireWarning>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            debug!(page, field = field.as_str(), error = %err, "acquisition degraded to empty");
            warnings.push(AcquireWarning {
                field,
                description: err.to_string(),
            });
            Vec::new()
        }
    }
}

//! Equation-number anchor search.
//!
//! The anchor is the `(12)`-style token set flush against a column's right
//! margin. It is found by OCR on a narrow corridor of one column, or from
//! the page's own words when a text layer exists.

use pagebox_core::{AnchorToken, BBox, Column, PageContext, is_anchor_text};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::DetectError;
use crate::ocr::{OcrEngine, SegmentationMode};
use crate::render::{PageRenderer, RenderedClip};

/// Engine name recorded on anchors read from the page's words.
pub const TEXT_LAYER_ENGINE: &str = "text-layer";

/// Parameters for [`EquationAnchorAgent`]. Lengths are in page points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    /// Distance kept from the column gutter.
    pub gutter_margin: f64,
    /// Points added above and below a vertical band.
    pub band_margin: f64,
    /// Corridors narrower or shorter than this are rejected.
    pub min_corridor: f64,
    pub dpi: u32,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            gutter_margin: 4.0,
            band_margin: 6.0,
            min_corridor: 2.0,
            dpi: 200,
        }
    }
}

/// Pick the anchor among matching candidates.
///
/// Candidates are visited left to right (stable on ties); a later one
/// replaces the current best when its `x0` or its confidence is strictly
/// greater. The rightmost token wins, and confidence only decides between
/// tokens at the same `x0`.
pub fn select_anchor(mut candidates: Vec<AnchorToken>) -> Option<AnchorToken> {
    candidates.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    let mut iter = candidates.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, c| {
        if c.bbox.x0 > best.bbox.x0 || c.confidence > best.confidence {
            c
        } else {
            best
        }
    }))
}

/// Locates equation numbers in a page column.
pub struct EquationAnchorAgent<'a> {
    ocr: &'a dyn OcrEngine,
    options: AnchorOptions,
}

impl std::fmt::Debug for EquationAnchorAgent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquationAnchorAgent")
            .field("ocr", &self.ocr.name())
            .field("options", &self.options)
            .finish()
    }
}

impl<'a> EquationAnchorAgent<'a> {
    pub fn new(ocr: &'a dyn OcrEngine, options: AnchorOptions) -> Self {
        Self { ocr, options }
    }

    pub fn options(&self) -> &AnchorOptions {
        &self.options
    }

    /// The scan corridor for `column`, optionally limited to the vertical
    /// band `(top, bottom)`.
    pub fn corridor(&self, ctx: &PageContext, column: Column, band: Option<(f64, f64)>) -> BBox {
        let o = &self.options;
        let gutter = ctx.gutter_x();
        let (x0, x1) = match column {
            Column::Left => (0.0, gutter - o.gutter_margin),
            Column::Right => (gutter + o.gutter_margin, ctx.width()),
        };
        let (top, bottom) = match band {
            Some((a, b)) => (a.min(b) - o.band_margin, a.max(b) + o.band_margin),
            None => (0.0, ctx.height()),
        };
        BBox::new(x0, top, x1, bottom).clamp_to(&ctx.page_box())
    }

    fn checked_corridor(
        &self,
        ctx: &PageContext,
        column: Column,
        band: Option<(f64, f64)>,
    ) -> Result<BBox, DetectError> {
        let corridor = self.corridor(ctx, column, band);
        let min = self.options.min_corridor;
        if !(corridor.width() >= min && corridor.height() >= min) {
            return Err(DetectError::Degenerate(format!(
                "corridor {:.1}x{:.1}pt",
                corridor.width(),
                corridor.height()
            )));
        }
        Ok(corridor)
    }

    /// The anchor token by OCR, or `None` when there is none or the search
    /// could not run.
    pub fn find_anchor(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        column: Column,
        band: Option<(f64, f64)>,
    ) -> Option<AnchorToken> {
        match self.try_find_anchor(ctx, renderer, column, band) {
            Ok(found) => found,
            Err(err) => {
                debug!(
                    page = ctx.page_number(),
                    ?column,
                    error = %err,
                    "anchor search degraded to none"
                );
                None
            }
        }
    }

    pub fn try_find_anchor(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        column: Column,
        band: Option<(f64, f64)>,
    ) -> Result<Option<AnchorToken>, DetectError> {
        if !self.ocr.is_available() {
            return Err(DetectError::Unavailable(self.ocr.name().to_string()));
        }
        let corridor = self.checked_corridor(ctx, column, band)?;

        let rendered = RenderedClip::render(renderer, corridor, self.options.dpi)?;
        let tokens = self
            .ocr
            .recognize(&rendered.image, SegmentationMode::SingleLine)?;
        trace!(count = tokens.len(), "corridor OCR tokens");

        let matches = tokens
            .into_iter()
            .filter(|t| is_anchor_text(t.text.trim()))
            .map(|t| AnchorToken {
                text: t.text.trim().to_string(),
                bbox: rendered.to_page(&t.bbox),
                engine: self.ocr.name().to_string(),
                confidence: t.confidence,
            })
            .collect();
        Ok(select_anchor(matches))
    }

    /// The anchor token from the page's words, for pages with a text layer.
    ///
    /// Uses the same corridor, pattern and selection as the OCR path, with
    /// confidence 100. Needs no OCR engine.
    pub fn find_anchor_in_text(
        &self,
        ctx: &PageContext,
        column: Column,
        band: Option<(f64, f64)>,
    ) -> Option<AnchorToken> {
        let corridor = match self.checked_corridor(ctx, column, band) {
            Ok(c) => c,
            Err(err) => {
                debug!(page = ctx.page_number(), error = %err, "text-layer anchor search skipped");
                return None;
            }
        };
        let matches = ctx
            .words()
            .iter()
            .filter(|w| corridor.contains(&w.bbox, 0.0) && is_anchor_text(w.text.trim()))
            .map(|w| AnchorToken {
                text: w.text.trim().to_string(),
                bbox: w.bbox,
                engine: TEXT_LAYER_ENGINE.to_string(),
                confidence: 100.0,
            })
            .collect();
        select_anchor(matches)
    }
}

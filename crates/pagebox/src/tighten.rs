//! Equation box tightening on a re-rendered raster patch.
//!
//! Top and bottom snap to ink, the left edge may move inward, and the right
//! edge is never touched: equation numbers are set hard against the
//! column's right margin, so the incoming right edge is already exact.

use pagebox_core::{BBox, PageContext};
use pagebox_raster::{
    EdgeOptions, SegmentOptions, column_profile, components, dominant_run, edge_map, first_above,
    horizontal_segments, ink_count, ink_mask, merge_runs, row_profile, runs_above, to_gray,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::DetectError;
use crate::render::{PageRenderer, RenderedClip};

/// Parameters for [`RasterTightener`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TightenOptions {
    /// Points added above and below the input before rendering.
    pub margin_v: f64,
    /// Points added left and right of the input before rendering.
    pub margin_h: f64,
    /// Pixels per point of the rendered patch.
    pub scale: f64,
    /// Rows count as ink when above this fraction of the row-profile peak.
    pub row_fraction: f64,
    /// Row runs at most this many pixel rows apart are merged.
    pub merge_gap_px: u32,
    /// Minimum fraction-bar length as a fraction of the patch width.
    pub bar_min_fraction: f64,
    /// Pixel margin added around a fraction bar.
    pub bar_margin_px: u32,
    /// Columns count as ink when above this fraction of the column peak.
    pub column_fraction: f64,
    /// Minimum component area in pixels for the left-edge scan.
    pub min_component_area: u64,
    /// Minimum component area as a fraction of the band's pixel area.
    pub component_area_fraction: f64,
    /// A qualifying component must be at least this wide or tall (pixels).
    pub min_component_extent: u32,
    /// Minimum width and height of the input and tightened boxes, in points.
    pub min_extent: f64,
}

impl Default for TightenOptions {
    fn default() -> Self {
        Self {
            margin_v: 12.0,
            margin_h: 6.0,
            scale: 3.0,
            row_fraction: 0.05,
            merge_gap_px: 6,
            bar_min_fraction: 0.30,
            bar_margin_px: 2,
            column_fraction: 0.03,
            min_component_area: 15,
            component_area_fraction: 0.002,
            min_component_extent: 3,
            min_extent: 1.0,
        }
    }
}

/// Tightens coarse equation boxes against rendered ink.
#[derive(Debug, Clone, Default)]
pub struct RasterTightener {
    options: TightenOptions,
}

impl RasterTightener {
    pub fn new(options: TightenOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TightenOptions {
        &self.options
    }

    /// The tightened box, or `bbox` unchanged if anything fails.
    ///
    /// `result.x1 == bbox.x1` always holds.
    pub fn tighten(&self, ctx: &PageContext, renderer: &dyn PageRenderer, bbox: &BBox) -> BBox {
        match self.try_tighten(ctx, renderer, bbox) {
            Ok(tight) => tight,
            Err(err) => {
                debug!(page = ctx.page_number(), error = %err, "tightening kept the original box");
                *bbox
            }
        }
    }

    pub fn try_tighten(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        bbox: &BBox,
    ) -> Result<BBox, DetectError> {
        let o = &self.options;
        if !(bbox.width() >= o.min_extent && bbox.height() >= o.min_extent) {
            return Err(DetectError::Degenerate(format!("input box {bbox:?} is too small")));
        }
        let clip = bbox.expand(o.margin_h, o.margin_v).clamp_to(&ctx.page_box());
        if clip.width() < 1.0 || clip.height() < 1.0 {
            return Err(DetectError::Degenerate(format!(
                "patch {:.1}x{:.1}pt is off the page",
                clip.width(),
                clip.height()
            )));
        }

        let dpi = (72.0 * o.scale).round() as u32;
        let rendered = RenderedClip::render(renderer, clip, dpi)?;
        let gray = to_gray(&rendered.image);
        let mask = ink_mask(&gray)?;
        let (w, h) = mask.dimensions();
        if ink_count(&mask) == 0 {
            return Err(DetectError::Degenerate("no ink in patch".into()));
        }

        // Vertical span from the row profile.
        let runs = merge_runs(&runs_above(&row_profile(&mask), o.row_fraction), o.merge_gap_px);
        let span = dominant_run(&runs)
            .ok_or_else(|| DetectError::Degenerate("no ink in patch".into()))?;
        let (mut top_px, mut bottom_px) = (span.start, span.end + 1);
        trace!(runs = runs.len(), top_px, bottom_px, "ink span");

        // Fraction bars anywhere in the patch belong to the expression, even
        // when the row profile left them out of the dominant run.
        let edges = edge_map(
            &gray,
            &EdgeOptions {
                smooth_radius: 0,
                dilate_radius: 0,
                close_radius: 0,
                ..EdgeOptions::default()
            },
        )?;
        let bars = horizontal_segments(
            &edges,
            &SegmentOptions {
                min_length: ((f64::from(w) * o.bar_min_fraction).ceil() as u32).max(1),
                max_gap: 2,
                max_thickness: 3,
            },
        );
        for bar in &bars {
            top_px = top_px.min(bar.y0.saturating_sub(o.bar_margin_px));
            bottom_px = bottom_px.max((bar.y1 + 1 + o.bar_margin_px).min(h));
        }
        trace!(bars = bars.len(), top_px, bottom_px, "span with fraction bars");

        // Left edge from column ink inside the span, pulled further left by
        // any substantial component there.
        let mut left_px = first_above(&column_profile(&mask, top_px..bottom_px), o.column_fraction);
        let band_area = f64::from(w) * f64::from(bottom_px - top_px);
        let min_area = (o.min_component_area as f64).max(o.component_area_fraction * band_area);
        for comp in components(&mask) {
            let b = comp.bounds;
            let in_band = b.y1 > f64::from(top_px) && b.y0 < f64::from(bottom_px);
            let extent = f64::from(o.min_component_extent);
            let large =
                comp.area as f64 >= min_area && (b.width() >= extent || b.height() >= extent);
            if in_band && large {
                let x = b.x0 as u32;
                left_px = Some(left_px.map_or(x, |l| l.min(x)));
            }
        }

        let mut top = rendered.y_to_page(f64::from(top_px));
        let mut bottom = rendered.y_to_page(f64::from(bottom_px));
        let mut x0 = left_px.map_or(bbox.x0, |px| rendered.x_to_page(f64::from(px)));

        top = top.clamp(bbox.top, bbox.bottom - o.min_extent);
        bottom = bottom.clamp(bbox.top + o.min_extent, bbox.bottom);
        x0 = x0.clamp(bbox.x0, bbox.x1 - o.min_extent);
        if bottom - top < o.min_extent {
            return Err(DetectError::Degenerate(format!(
                "tightened span {top:.1}..{bottom:.1} collapsed"
            )));
        }

        Ok(BBox::new(x0, top, bbox.x1, bottom))
    }
}

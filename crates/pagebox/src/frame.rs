//! Table and figure frame detection.
//!
//! Tier 1 scans the page's vector rectangles. When that finds nothing, tier
//! 2 renders the column region and looks for frame-shaped edge contours:
//! first minimum-area rotated rectangles under the strict caption gate,
//! then plain contour bounds under a looser one.

use pagebox_core::{
    BBox, ColumnBand, DetectionCandidate, DetectionSource, FrameKind, PageContext,
    sort_candidates,
};
use pagebox_raster::{EdgeOptions, RotatedBox, bounding_boxes, edge_map, rotated_boxes, to_gray};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::DetectError;
use crate::render::{PageRenderer, RenderedClip};

/// Thresholds for [`FrameBoxDetector`]. Lengths are in page points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOptions {
    pub min_width: f64,
    pub min_height: f64,
    /// Overhang allowed when testing caption position.
    pub caption_tolerance: f64,
    /// A table caption's bottom must sit at least this far above the
    /// frame's bottom.
    pub caption_bottom_gap: f64,
    /// Outward padding applied to accepted vector frames.
    pub padding: f64,
    pub raster_dpi: u32,
    /// Extra height above a table caption included in the raster clip, so
    /// the frame's top border is rendered.
    pub clip_margin: f64,
    /// Loose raster pass: the caption must end within this fraction of the
    /// candidate's height from its top.
    pub loose_caption_fraction: f64,
    pub smooth_radius: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub dilate_radius: u8,
    pub close_radius: u8,
}

impl Default for FrameOptions {
    fn default() -> Self {
        let edges = EdgeOptions::default();
        Self {
            min_width: 120.0,
            min_height: 80.0,
            caption_tolerance: 4.0,
            caption_bottom_gap: 6.0,
            padding: 2.0,
            raster_dpi: 150,
            clip_margin: 24.0,
            loose_caption_fraction: 0.35,
            smooth_radius: edges.smooth_radius,
            canny_low: edges.canny_low,
            canny_high: edges.canny_high,
            dilate_radius: edges.dilate_radius,
            close_radius: edges.close_radius,
        }
    }
}

impl FrameOptions {
    fn edge_options(&self) -> EdgeOptions {
        EdgeOptions {
            smooth_radius: self.smooth_radius,
            canny_low: self.canny_low,
            canny_high: self.canny_high,
            dilate_radius: self.dilate_radius,
            close_radius: self.close_radius,
        }
    }
}

/// The caption-position rule shared by the vector and strict raster tiers.
///
/// - Table: the caption lies inside `frame` (within `tolerance`) and its
///   bottom is at least `bottom_gap` above the frame's bottom.
/// - Figure: the frame ends at or above the caption's top, within
///   `tolerance`.
pub fn caption_gate(
    kind: FrameKind,
    frame: &BBox,
    caption: &BBox,
    tolerance: f64,
    bottom_gap: f64,
) -> bool {
    match kind {
        FrameKind::Table => {
            frame.contains(caption, tolerance) && caption.bottom <= frame.bottom - bottom_gap
        }
        FrameKind::Figure => frame.bottom <= caption.top + tolerance,
    }
}

/// Looser rule for the fallback raster pass: a table caption only has to
/// overlap the frame horizontally and end within the top `fraction` of it.
fn loose_caption_gate(
    kind: FrameKind,
    frame: &BBox,
    caption: &BBox,
    tolerance: f64,
    fraction: f64,
) -> bool {
    match kind {
        FrameKind::Table => {
            caption.x1 > frame.x0
                && caption.x0 < frame.x1
                && caption.top >= frame.top - tolerance
                && caption.bottom <= frame.top + fraction * frame.height()
        }
        FrameKind::Figure => frame.bottom <= caption.top + tolerance,
    }
}

/// Side lengths of a rotated box measured closest to the page axes.
fn upright_dims(r: &RotatedBox) -> (f64, f64) {
    let a = r.angle.rem_euclid(180.0);
    if (45.0..135.0).contains(&a) {
        (r.height, r.width)
    } else {
        (r.width, r.height)
    }
}

/// Finds rectangular table and figure frames.
#[derive(Debug, Clone, Default)]
pub struct FrameBoxDetector {
    options: FrameOptions,
}

impl FrameBoxDetector {
    pub fn new(options: FrameOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FrameOptions {
        &self.options
    }

    /// All plausible frames, best first. Failures yield an empty list.
    pub fn detect(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        band: Option<ColumnBand>,
        caption: Option<&BBox>,
        kind: FrameKind,
    ) -> Vec<DetectionCandidate> {
        match self.try_detect(ctx, renderer, band, caption, kind) {
            Ok(found) => found,
            Err(err) => {
                debug!(page = ctx.page_number(), error = %err, "frame detection degraded to empty");
                Vec::new()
            }
        }
    }

    /// Like [`detect`](Self::detect), but reports why the raster tier could
    /// not run.
    pub fn try_detect(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        band: Option<ColumnBand>,
        caption: Option<&BBox>,
        kind: FrameKind,
    ) -> Result<Vec<DetectionCandidate>, DetectError> {
        let vector = self.vector_candidates(ctx, band, caption, kind);
        debug!(page = ctx.page_number(), tier = "vector", count = vector.len(), "frame candidates");
        if !vector.is_empty() {
            return Ok(vector);
        }
        let raster = self.raster_candidates(ctx, renderer, band, caption, kind)?;
        debug!(page = ctx.page_number(), tier = "raster", count = raster.len(), "frame candidates");
        Ok(raster)
    }

    /// Tier 1: vector rectangles.
    pub fn vector_candidates(
        &self,
        ctx: &PageContext,
        band: Option<ColumnBand>,
        caption: Option<&BBox>,
        kind: FrameKind,
    ) -> Vec<DetectionCandidate> {
        let o = &self.options;
        let mut out: Vec<DetectionCandidate> = Vec::new();
        for rect in ctx.rects() {
            let b = rect.bbox;
            if b.width() < o.min_width || b.height() < o.min_height {
                continue;
            }
            if band.is_some_and(|band| !band.overlaps(&b)) {
                continue;
            }
            if let Some(cap) = caption {
                if !caption_gate(kind, &b, cap, o.caption_tolerance, o.caption_bottom_gap) {
                    trace!(?b, "vector frame rejected by caption gate");
                    continue;
                }
            }
            let padded = b.expand(o.padding, o.padding).clamp_to(&ctx.page_box());
            // A rectangle painted with both fill and stroke is reported twice.
            if out.iter().any(|c| c.bbox.approx_eq(&padded, 1e-6)) {
                continue;
            }
            out.push(DetectionCandidate {
                bbox: padded,
                source: DetectionSource::Vector,
                score: b.area(),
            });
        }
        sort_candidates(&mut out);
        out
    }

    /// Page region rendered by tier 2.
    fn raster_clip(
        &self,
        ctx: &PageContext,
        band: Option<ColumnBand>,
        caption: Option<&BBox>,
        kind: FrameKind,
    ) -> BBox {
        let (x0, x1) = band.map_or((0.0, ctx.width()), |b| (b.x_left, b.x_right));
        let (top, bottom) = match caption {
            None => (0.0, ctx.height()),
            Some(cap) => match kind {
                FrameKind::Table => (cap.top - self.options.clip_margin, ctx.height()),
                FrameKind::Figure => (0.0, cap.top + self.options.caption_tolerance),
            },
        };
        BBox::new(x0, top, x1, bottom).clamp_to(&ctx.page_box())
    }

    /// Tier 2: raster contours.
    pub fn raster_candidates(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        band: Option<ColumnBand>,
        caption: Option<&BBox>,
        kind: FrameKind,
    ) -> Result<Vec<DetectionCandidate>, DetectError> {
        let o = &self.options;
        let clip = self.raster_clip(ctx, band, caption, kind);
        if clip.width() < 2.0 || clip.height() < 2.0 {
            return Err(DetectError::Degenerate(format!(
                "raster clip {:.1}x{:.1}pt",
                clip.width(),
                clip.height()
            )));
        }

        let rendered = RenderedClip::render(renderer, clip, o.raster_dpi)?;
        let gray = to_gray(&rendered.image);
        let edges = edge_map(&gray, &o.edge_options())?;
        let min_w_px = o.min_width / 2.0 * rendered.scale;
        let min_h_px = o.min_height / 2.0 * rendered.scale;

        let mut strict = Vec::new();
        for rot in rotated_boxes(&edges) {
            let (w, h) = upright_dims(&rot);
            if w < min_w_px || h < min_h_px {
                continue;
            }
            let bbox = rendered.to_page(&rot.aabb).clamp_to(&clip);
            if !bbox.is_valid() {
                continue;
            }
            if let Some(cap) = caption {
                if !caption_gate(kind, &bbox, cap, o.caption_tolerance, o.caption_bottom_gap) {
                    continue;
                }
            }
            strict.push(DetectionCandidate {
                bbox,
                source: DetectionSource::Raster,
                score: bbox.area() / rot.aspect_ratio(),
            });
        }
        trace!(count = strict.len(), "strict raster pass");
        if !strict.is_empty() {
            sort_candidates(&mut strict);
            return Ok(strict);
        }

        let mut loose = Vec::new();
        for px in bounding_boxes(&edges) {
            if px.width() < min_w_px || px.height() < min_h_px {
                continue;
            }
            let bbox = rendered.to_page(&px).clamp_to(&clip);
            if let Some(cap) = caption {
                let fraction = o.loose_caption_fraction;
                if !loose_caption_gate(kind, &bbox, cap, o.caption_tolerance, fraction) {
                    continue;
                }
            }
            loose.push(DetectionCandidate {
                bbox,
                source: DetectionSource::Raster,
                score: px.area(),
            });
        }
        trace!(count = loose.len(), "loose raster pass");
        sort_candidates(&mut loose);
        Ok(loose)
    }
}

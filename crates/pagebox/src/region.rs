//! Region-of-interest refinement through the structure engine.
//!
//! The ROI is rendered on its own, wrapped in a one-page PDF whose page size
//! equals the raster's pixel size, and converted. The envelope of the
//! returned cells is mapped back into the original page.

use pagebox_core::{BBox, PageContext};
use pagebox_parse::write_image_document;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::DetectError;
use crate::render::{PageRenderer, RenderedClip};
use crate::structure::{StructureEngine, SyntheticDocument, envelope, extract_cell_boxes};

/// Parameters for [`RegionConversionBridge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionOptions {
    /// Render resolution for the ROI.
    pub dpi: u32,
    /// ROIs narrower or shorter than this (points) are rejected unrendered.
    pub min_roi: f64,
    /// Refined boxes narrower than this (points) are dropped.
    pub min_width: f64,
    /// Refined boxes shorter than this (points) are dropped.
    pub min_height: f64,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            dpi: 200,
            min_roi: 2.0,
            min_width: 8.0,
            min_height: 8.0,
        }
    }
}

/// Refines a coarse table region with cell geometry from a
/// [`StructureEngine`].
pub struct RegionConversionBridge<'a> {
    engine: &'a dyn StructureEngine,
    options: RegionOptions,
}

impl std::fmt::Debug for RegionConversionBridge<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionConversionBridge")
            .field("engine", &self.engine.name())
            .field("options", &self.options)
            .finish()
    }
}

impl<'a> RegionConversionBridge<'a> {
    pub fn new(engine: &'a dyn StructureEngine, options: RegionOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &RegionOptions {
        &self.options
    }

    /// Refined boxes for `roi` (zero or one), never an error.
    ///
    /// `dpi` overrides [`RegionOptions::dpi`].
    pub fn refine_roi(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        roi: &BBox,
        dpi: Option<u32>,
    ) -> Vec<BBox> {
        match self.try_refine_roi(ctx, renderer, roi, dpi) {
            Ok(found) => found,
            Err(err) => {
                debug!(page = ctx.page_number(), error = %err, "ROI refinement degraded to empty");
                Vec::new()
            }
        }
    }

    pub fn try_refine_roi(
        &self,
        ctx: &PageContext,
        renderer: &dyn PageRenderer,
        roi: &BBox,
        dpi: Option<u32>,
    ) -> Result<Vec<BBox>, DetectError> {
        let o = &self.options;
        if !(roi.width() >= o.min_roi && roi.height() >= o.min_roi) {
            return Err(DetectError::Degenerate(format!(
                "ROI {:.1}x{:.1}pt on page {}",
                roi.width(),
                roi.height(),
                ctx.page_number()
            )));
        }
        if !self.engine.is_available() {
            return Err(DetectError::Unavailable(self.engine.name().to_string()));
        }

        let rendered = RenderedClip::render(renderer, *roi, dpi.unwrap_or(o.dpi))?;
        let rgb = rendered.image.to_rgb8();
        let (w, h) = rgb.dimensions();
        let document = SyntheticDocument {
            bytes: write_image_document(w, h, rgb.as_raw())?,
            width: w,
            height: h,
        };

        let response = self.engine.convert(&document)?;
        let cells = extract_cell_boxes(&response, f64::from(h));
        trace!(cells = cells.len(), width = w, height = h, "structure engine cells");
        let Some(env) = envelope(&cells) else {
            return Ok(Vec::new());
        };

        let x1 = if env.x1 >= f64::from(w) {
            roi.x1
        } else {
            rendered.x_to_page(env.x1)
        };
        let bottom = if env.bottom >= f64::from(h) {
            roi.bottom
        } else {
            rendered.y_to_page(env.bottom)
        };
        let refined = BBox::new(
            rendered.x_to_page(env.x0),
            rendered.y_to_page(env.top),
            x1,
            bottom,
        );

        if refined.width() < o.min_width || refined.height() < o.min_height {
            trace!(?refined, "refined box below minimum size");
            return Ok(Vec::new());
        }
        Ok(vec![refined])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderError;
    use crate::structure::StructureError;
    use image::DynamicImage;
    use std::cell::Cell;

    struct CountingRenderer {
        calls: Cell<u32>,
    }

    impl PageRenderer for CountingRenderer {
        fn render(&self, _: &BBox, _: u32) -> Result<DynamicImage, RenderError> {
            self.calls.set(self.calls.get() + 1);
            Err(RenderError::Failed("unused".into()))
        }
    }

    struct Unused;

    impl StructureEngine for Unused {
        fn name(&self) -> &str {
            "unused"
        }
        fn convert(&self, _: &SyntheticDocument) -> Result<serde_json::Value, StructureError> {
            Err(StructureError::Failed("unused".into()))
        }
    }

    #[test]
    fn tiny_roi_is_rejected_before_rendering() {
        let ctx = PageContext::from_parts(0, 612.0, 792.0, Vec::new());
        let renderer = CountingRenderer { calls: Cell::new(0) };
        let bridge = RegionConversionBridge::new(&Unused, RegionOptions::default());

        let roi = BBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(bridge.refine_roi(&ctx, &renderer, &roi, Some(200)).is_empty());
        assert!(matches!(
            bridge.try_refine_roi(&ctx, &renderer, &roi, Some(200)),
            Err(DetectError::Degenerate(_))
        ));
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn render_failure_is_empty() {
        let ctx = PageContext::from_parts(0, 612.0, 792.0, Vec::new());
        let renderer = CountingRenderer { calls: Cell::new(0) };
        let bridge = RegionConversionBridge::new(&Unused, RegionOptions::default());
        let roi = BBox::new(50.0, 50.0, 250.0, 150.0);
        assert!(bridge.refine_roi(&ctx, &renderer, &roi, None).is_empty());
        assert_eq!(renderer.calls.get(), 1);
    }
}

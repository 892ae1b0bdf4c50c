//! Test doubles for the rendering, OCR and structure seams.

#![allow(dead_code)]

use std::cell::Cell;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use pagebox::{
    BBox, OcrEngine, OcrError, OcrToken, PageRenderer, RenderError, SegmentationMode,
    StructureEngine, StructureError, SyntheticDocument, pixel_size, scale_for,
};
use pagebox::pagebox_raster::PixelRect;
use serde_json::Value;

/// Paints black boxes (given in page points) on white paper.
#[derive(Debug, Default)]
pub struct InkRenderer {
    pub ink: Vec<BBox>,
    pub calls: Cell<u32>,
}

impl InkRenderer {
    pub fn new(ink: Vec<BBox>) -> Self {
        Self {
            ink,
            calls: Cell::new(0),
        }
    }
}

impl PageRenderer for InkRenderer {
    fn render(&self, clip: &BBox, dpi: u32) -> Result<DynamicImage, RenderError> {
        self.calls.set(self.calls.get() + 1);
        let scale = scale_for(dpi);
        let (w, h) = pixel_size(clip, scale);
        let mut img = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));
        for b in &self.ink {
            let x0 = ((b.x0 - clip.x0) * scale).round() as i32;
            let y0 = ((b.top - clip.top) * scale).round() as i32;
            let x1 = ((b.x1 - clip.x0) * scale).round() as i32;
            let y1 = ((b.bottom - clip.top) * scale).round() as i32;
            if x1 <= x0 || y1 <= y0 {
                continue;
            }
            let rect = Rect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32);
            draw_filled_rect_mut(&mut img, rect, Rgb([0, 0, 0]));
        }
        Ok(DynamicImage::ImageRgb8(img))
    }
}

/// Always fails, counting attempts.
#[derive(Debug, Default)]
pub struct FailingRenderer {
    pub calls: Cell<u32>,
}

impl PageRenderer for FailingRenderer {
    fn render(&self, _: &BBox, _: u32) -> Result<DynamicImage, RenderError> {
        self.calls.set(self.calls.get() + 1);
        Err(RenderError::Unavailable("no renderer in tests".into()))
    }
}

/// The four sides of a stroked frame, `stroke` points thick, inside `outer`.
pub fn frame_strokes(outer: BBox, stroke: f64) -> Vec<BBox> {
    vec![
        BBox::new(outer.x0, outer.top, outer.x1, outer.top + stroke),
        BBox::new(outer.x0, outer.bottom - stroke, outer.x1, outer.bottom),
        BBox::new(outer.x0, outer.top, outer.x0 + stroke, outer.bottom),
        BBox::new(outer.x1 - stroke, outer.top, outer.x1, outer.bottom),
    ]
}

/// Returns the same tokens for every image.
#[derive(Debug)]
pub struct ScriptedOcr {
    pub available: bool,
    pub tokens: Vec<OcrToken>,
}

impl ScriptedOcr {
    pub fn new(tokens: Vec<OcrToken>) -> Self {
        Self {
            available: true,
            tokens,
        }
    }
}

/// An OCR token at pixel column `x0` of the rendered corridor.
pub fn ocr_token(text: &str, x0: f64, confidence: f64) -> OcrToken {
    OcrToken {
        text: text.to_string(),
        bbox: PixelRect::new(x0, 100.0, x0 + 40.0, 130.0),
        confidence,
    }
}

impl OcrEngine for ScriptedOcr {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn recognize(
        &self,
        _: &DynamicImage,
        _: SegmentationMode,
    ) -> Result<Vec<OcrToken>, OcrError> {
        if !self.available {
            return Err(OcrError::Unavailable);
        }
        Ok(self.tokens.clone())
    }
}

/// Answers every conversion with a fixed JSON document and remembers the
/// page size it was given.
#[derive(Debug)]
pub struct CannedStructure {
    pub response: Value,
    pub seen: Cell<Option<(u32, u32)>>,
}

impl CannedStructure {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            seen: Cell::new(None),
        }
    }
}

impl StructureEngine for CannedStructure {
    fn name(&self) -> &str {
        "canned"
    }

    fn convert(&self, document: &SyntheticDocument) -> Result<Value, StructureError> {
        self.seen.set(Some((document.width, document.height)));
        if !document.bytes.starts_with(b"%PDF") {
            return Err(StructureError::Failed("not a PDF".into()));
        }
        Ok(self.response.clone())
    }
}

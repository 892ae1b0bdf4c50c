//! [`PageRenderer`] backed by pdfium.
//!
//! Requires the pdfium dynamic library at runtime; it is looked up next to
//! the executable, in common library directories, then on the system path.

use image::DynamicImage;
use pagebox_core::BBox;
use pdfium_render::prelude::*;

use crate::render::{PageRenderer, RenderError, pixel_size, scale_for};

/// Renders clips of one page of an in-memory PDF.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
    bytes: Vec<u8>,
    page_index: usize,
}

impl std::fmt::Debug for PdfiumRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumRenderer")
            .field("bytes", &self.bytes.len())
            .field("page_index", &self.page_index)
            .finish_non_exhaustive()
    }
}

fn bind_pdfium() -> Result<Pdfium, RenderError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/lib"))
        })
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/local/lib"))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| RenderError::Unavailable(format!("pdfium library not found: {e}")))?;
    Ok(Pdfium::new(bindings))
}

impl PdfiumRenderer {
    /// Bind pdfium and hold `bytes` for rendering page `page_index`.
    pub fn new(bytes: Vec<u8>, page_index: usize) -> Result<Self, RenderError> {
        Ok(Self {
            pdfium: bind_pdfium()?,
            bytes,
            page_index,
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render(&self, clip: &BBox, dpi: u32) -> Result<DynamicImage, RenderError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(&self.bytes, None)
            .map_err(|e| RenderError::Failed(format!("failed to load PDF: {e}")))?;
        let page = document
            .pages()
            .iter()
            .nth(self.page_index)
            .ok_or_else(|| RenderError::Failed(format!("page {} not found", self.page_index)))?;

        let scale = scale_for(dpi);
        let page_box = BBox::new(
            0.0,
            0.0,
            f64::from(page.width().value),
            f64::from(page.height().value),
        );
        let (page_w, page_h) = pixel_size(&page_box, scale);
        let config = PdfRenderConfig::new()
            .set_target_width(page_w as i32)
            .set_target_height(page_h as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RenderError::Failed(e.to_string()))?;
        let full = bitmap.as_image();

        let area = clip.clamp_to(&page_box);
        if !area.is_valid() {
            return Err(RenderError::Failed(format!("clip {clip:?} lies outside the page")));
        }
        let x = (area.x0 * scale).round() as u32;
        let y = (area.top * scale).round() as u32;
        let (w, h) = pixel_size(&area, scale);
        let w = w.min(full.width().saturating_sub(x));
        let h = h.min(full.height().saturating_sub(y));
        Ok(full.crop_imm(x, y, w, h))
    }
}

//! Page rendering seam.
//!
//! Detectors never rasterize pages themselves; they ask a [`PageRenderer`]
//! for a clip of the current page at a given DPI and map pixel results back
//! to page points through [`RenderedClip`].

use image::DynamicImage;
use pagebox_core::BBox;
use pagebox_raster::PixelRect;
use thiserror::Error;

/// Error returned by a [`PageRenderer`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// No rendering backend could be loaded.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),

    #[error("failed to render clip: {0}")]
    Failed(String),

    /// The renderer returned an image with no pixels.
    #[error("rendered image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Rasterizes a region of one page.
///
/// `clip` is in top-left page points. The returned image should measure
/// about `dpi / 72` pixels per point of `clip`.
pub trait PageRenderer {
    fn render(&self, clip: &BBox, dpi: u32) -> Result<DynamicImage, RenderError>;
}

impl<T: PageRenderer + ?Sized> PageRenderer for &T {
    fn render(&self, clip: &BBox, dpi: u32) -> Result<DynamicImage, RenderError> {
        (**self).render(clip, dpi)
    }
}

/// Pixels per point at `dpi`.
pub fn scale_for(dpi: u32) -> f64 {
    f64::from(dpi) / 72.0
}

/// Pixel size of `clip` rendered at `scale`, rounded to whole pixels and at
/// least one pixel per side.
pub fn pixel_size(clip: &BBox, scale: f64) -> (u32, u32) {
    let w = (clip.width() * scale).round().max(1.0);
    let h = (clip.height() * scale).round().max(1.0);
    (w as u32, h as u32)
}

/// A rendered clip together with the mapping back to page points.
#[derive(Debug, Clone)]
pub struct RenderedClip {
    pub image: DynamicImage,
    /// The clip that was rendered, in page points.
    pub clip: BBox,
    /// Pixels per point.
    pub scale: f64,
}

impl RenderedClip {
    /// Render `clip` at `dpi`, rejecting empty images.
    pub fn render(renderer: &dyn PageRenderer, clip: BBox, dpi: u32) -> Result<Self, RenderError> {
        let image = renderer.render(&clip, dpi)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(RenderError::Empty {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self {
            image,
            clip,
            scale: scale_for(dpi),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn x_to_page(&self, px: f64) -> f64 {
        self.clip.x0 + px / self.scale
    }

    pub fn y_to_page(&self, py: f64) -> f64 {
        self.clip.top + py / self.scale
    }

    /// Map a pixel rectangle to page points.
    pub fn to_page(&self, r: &PixelRect) -> BBox {
        BBox::new(
            self.x_to_page(r.x0),
            self.y_to_page(r.y0),
            self.x_to_page(r.x1),
            self.y_to_page(r.y1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    struct Blank;

    impl PageRenderer for Blank {
        fn render(&self, clip: &BBox, dpi: u32) -> Result<DynamicImage, RenderError> {
            let (w, h) = pixel_size(clip, scale_for(dpi));
            Ok(DynamicImage::ImageLuma8(GrayImage::new(w, h)))
        }
    }

    struct Nothing;

    impl PageRenderer for Nothing {
        fn render(&self, _: &BBox, _: u32) -> Result<DynamicImage, RenderError> {
            Ok(DynamicImage::ImageLuma8(GrayImage::new(0, 0)))
        }
    }

    #[test]
    fn maps_pixels_back_to_points() {
        let clip = BBox::new(100.0, 200.0, 172.0, 236.0);
        let r = RenderedClip::render(&Blank, clip, 144).unwrap();
        assert_eq!((r.width(), r.height()), (144, 72));
        assert_eq!(r.scale, 2.0);
        let page = r.to_page(&PixelRect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(page, BBox::new(105.0, 210.0, 115.0, 220.0));
    }

    #[test]
    fn empty_render_is_an_error() {
        let err = RenderedClip::render(&Nothing, BBox::new(0.0, 0.0, 10.0, 10.0), 72).unwrap_err();
        assert_eq!(err, RenderError::Empty { width: 0, height: 0 });
    }

    #[test]
    fn pixel_size_rounds() {
        assert_eq!(pixel_size(&BBox::new(0.0, 0.0, 10.0, 0.1), 150.0 / 72.0), (21, 1));
    }
}

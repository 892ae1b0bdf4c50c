//! Connected ink components.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};

use crate::shapes::PixelRect;

/// An 8-connected blob of ink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub bounds: PixelRect,
    /// Ink pixel count.
    pub area: u64,
}

/// Label the mask's ink and return one entry per component, in label order
/// (raster scan order of each component's first pixel).
pub fn components(mask: &GrayImage) -> Vec<Component> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    // (min_x, min_y, max_x, max_y, area) per label; label 0 is background.
    let mut stats: Vec<Option<(u32, u32, u32, u32, u64)>> = Vec::new();
    for (x, y, p) in labels.enumerate_pixels() {
        let label = p[0] as usize;
        if label == 0 {
            continue;
        }
        if stats.len() < label {
            stats.resize(label, None);
        }
        let slot = &mut stats[label - 1];
        *slot = Some(match *slot {
            Some((x0, y0, x1, y1, n)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y), n + 1),
            None => (x, y, x, y, 1),
        });
    }

    stats
        .into_iter()
        .flatten()
        .map(|(x0, y0, x1, y1, area)| Component {
            bounds: PixelRect::from_inclusive(x0, y0, x1, y1),
            area,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binarize::INK;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn two_blobs() {
        let mut mask = GrayImage::new(50, 20);
        draw_filled_rect_mut(&mut mask, Rect::at(2, 2).of_size(4, 3), Luma([INK]));
        draw_filled_rect_mut(&mut mask, Rect::at(20, 10).of_size(10, 5), Luma([INK]));

        let comps = components(&mask);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].area, 12);
        assert_eq!(comps[0].bounds, PixelRect::new(2.0, 2.0, 6.0, 5.0));
        assert_eq!(comps[1].area, 50);
    }

    #[test]
    fn diagonal_pixels_connect() {
        let mut mask = GrayImage::new(5, 5);
        for i in 0..5 {
            mask.put_pixel(i, i, Luma([INK]));
        }
        let comps = components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].area, 5);
    }

    #[test]
    fn blank_mask() {
        assert!(components(&GrayImage::new(8, 8)).is_empty());
    }
}

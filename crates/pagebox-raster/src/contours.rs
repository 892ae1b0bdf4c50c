//! Outer contours of a binary mask and their enclosing rectangles.

use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use tracing::trace;

use crate::shapes::{PixelRect, RotatedBox, min_area_rect};

/// Outermost borders only: outer borders with no enclosing contour.
pub fn outer_contours(mask: &GrayImage) -> Vec<Contour<u32>> {
    let all = find_contours::<u32>(mask);
    let total = all.len();
    let outer: Vec<_> = all
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect();
    trace!(total, outer = outer.len(), "contours");
    outer
}

/// Axis-aligned bounds of a contour, covering whole pixels.
fn contour_bounds(contour: &Contour<u32>) -> Option<PixelRect> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(PixelRect::from_inclusive(min_x, min_y, max_x, max_y))
}

/// Minimum-area rotated rectangle for every outermost contour.
pub fn rotated_boxes(mask: &GrayImage) -> Vec<RotatedBox> {
    outer_contours(mask)
        .iter()
        .filter_map(|c| {
            let pts: Vec<(f64, f64)> = c
                .points
                .iter()
                .map(|p| (f64::from(p.x), f64::from(p.y)))
                .collect();
            min_area_rect(&pts)
        })
        .collect()
}

/// Axis-aligned bounds of every outermost contour.
pub fn bounding_boxes(mask: &GrayImage) -> Vec<PixelRect> {
    outer_contours(mask).iter().filter_map(contour_bounds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binarize::INK;
    use image::Luma;
    use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
    use imageproc::rect::Rect;

    #[test]
    fn nested_borders_report_outermost_only() {
        let mut mask = GrayImage::new(100, 80);
        draw_hollow_rect_mut(&mut mask, Rect::at(10, 10).of_size(60, 40), Luma([INK]));
        draw_filled_rect_mut(&mut mask, Rect::at(30, 25).of_size(5, 5), Luma([INK]));

        let boxes = bounding_boxes(&mask);
        assert_eq!(boxes, vec![PixelRect::new(10.0, 10.0, 70.0, 50.0)]);
    }

    #[test]
    fn separate_blobs_each_get_a_box() {
        let mut mask = GrayImage::new(100, 80);
        draw_filled_rect_mut(&mut mask, Rect::at(5, 5).of_size(20, 10), Luma([INK]));
        draw_filled_rect_mut(&mut mask, Rect::at(50, 40).of_size(30, 30), Luma([INK]));

        let mut boxes = rotated_boxes(&mask);
        boxes.sort_by(|a, b| a.aabb.x0.total_cmp(&b.aabb.x0));
        assert_eq!(boxes.len(), 2);
        assert!((boxes[0].width.max(boxes[0].height) - 20.0).abs() < 1e-6);
        assert!((boxes[1].width - 30.0).abs() < 1e-6);
        assert!((boxes[1].aabb.x0 - 49.5).abs() < 1e-6);
    }

    #[test]
    fn blank_mask_has_no_contours() {
        assert!(outer_contours(&GrayImage::new(10, 10)).is_empty());
    }
}

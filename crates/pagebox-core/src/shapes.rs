//! Axis-aligned rectangle extraction from painted paths.
//!
//! Converts vector paths (bottom-left user space) into [`Rect`]s in top-left
//! page points. Only subpaths made of straight, axis-parallel edges count;
//! anything with curves or diagonal edges is skipped.

use crate::geometry::{BBox, Point};
use crate::path::{Path, PathSegment};

/// A rectangle found among a page's vector drawings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Bounds in top-left page points.
    pub bbox: BBox,
    pub line_width: f64,
    pub stroke: bool,
    pub fill: bool,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.bbox.width()
    }

    pub fn height(&self) -> f64 {
        self.bbox.height()
    }
}

/// Edge-direction tolerance in points. Producers emit rectangles through
/// transforms that leave sub-point rounding noise on the vertices.
const AXIS_TOLERANCE: f64 = 0.01;

/// Split segments into subpaths, each beginning at a `MoveTo`.
fn split_subpaths(segments: &[PathSegment]) -> Vec<&[PathSegment]> {
    let mut subpaths = Vec::new();
    let mut start = 0;
    for (i, seg) in segments.iter().enumerate() {
        if i > start && matches!(seg, PathSegment::MoveTo(_)) {
            subpaths.push(&segments[start..i]);
            start = i;
        }
    }
    if start < segments.len() {
        subpaths.push(&segments[start..]);
    }
    subpaths
}

/// Vertices of a straight-edged subpath, or `None` if it contains a curve.
///
/// A trailing vertex equal to the first one is dropped, so both `re`-style
/// (explicit `h`) and hand-closed subpaths yield the same vertex list.
fn polygon_vertices(subpath: &[PathSegment]) -> Option<(Vec<Point>, bool)> {
    let mut vertices = Vec::with_capacity(5);
    let mut closed = false;
    for seg in subpath {
        match seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vertices.push(*p),
            PathSegment::CurveTo { .. } => return None,
            PathSegment::ClosePath => closed = true,
        }
    }
    if vertices.len() >= 2 {
        let first = vertices[0];
        let last = vertices[vertices.len() - 1];
        if (first.x - last.x).abs() < AXIS_TOLERANCE && (first.y - last.y).abs() < AXIS_TOLERANCE
        {
            vertices.pop();
            closed = true;
        }
    }
    Some((vertices, closed))
}

/// Bounds in top-left space if the four vertices form an axis-aligned rectangle.
fn axis_aligned_bounds(vertices: &[Point], page_height: f64) -> Option<BBox> {
    if vertices.len() != 4 {
        return None;
    }
    for i in 0..4 {
        let a = vertices[i];
        let b = vertices[(i + 1) % 4];
        if (b.x - a.x).abs() > AXIS_TOLERANCE && (b.y - a.y).abs() > AXIS_TOLERANCE {
            return None;
        }
    }
    let x0 = vertices.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let x1 = vertices.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let y_low = vertices.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_high = vertices.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let bbox = BBox::new(x0, page_height - y_high, x1, page_height - y_low);
    bbox.is_valid().then_some(bbox)
}

/// Extract every axis-aligned rectangle from the given paths.
///
/// Unpainted paths (neither stroked nor filled) are ignored.
pub fn rects_from_paths(paths: &[Path], page_height: f64) -> Vec<Rect> {
    let mut rects = Vec::new();
    for path in paths.iter().filter(|p| p.stroke || p.fill) {
        for subpath in split_subpaths(&path.segments) {
            let Some((vertices, closed)) = polygon_vertices(subpath) else {
                continue;
            };
            // A filled subpath is implicitly closed.
            if !closed && !path.fill {
                continue;
            }
            if let Some(bbox) = axis_aligned_bounds(&vertices, page_height) {
                rects.push(Rect {
                    bbox,
                    line_width: path.line_width,
                    stroke: path.stroke,
                    fill: path.fill,
                });
            }
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Ctm;
    use crate::path::PathBuilder;

    #[test]
    fn re_operator_rect_is_flipped_to_top_left() {
        let path = Path::rectangle(50.0, 542.0, 300.0, 200.0);
        let rects = rects_from_paths(&[path], 792.0);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].bbox, BBox::new(50.0, 50.0, 350.0, 250.0));
    }

    #[test]
    fn hand_closed_line_loop_is_a_rect() {
        let mut b = PathBuilder::new(Ctm::identity());
        b.move_to(0.0, 0.0);
        b.line_to(100.0, 0.0);
        b.line_to(100.0, 50.0);
        b.line_to(0.0, 50.0);
        b.line_to(0.0, 0.0);
        let rects = rects_from_paths(&[b.finish(true, false, 1.0)], 100.0);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].bbox, BBox::new(0.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn open_stroked_polyline_is_not_a_rect() {
        let mut b = PathBuilder::new(Ctm::identity());
        b.move_to(0.0, 0.0);
        b.line_to(100.0, 0.0);
        b.line_to(100.0, 50.0);
        b.line_to(0.0, 50.0);
        assert!(rects_from_paths(&[b.finish(true, false, 1.0)], 100.0).is_empty());
    }

    #[test]
    fn diagonal_quad_is_rejected() {
        let mut b = PathBuilder::new(Ctm::identity());
        b.move_to(0.0, 0.0);
        b.line_to(10.0, 5.0);
        b.line_to(10.0, 50.0);
        b.line_to(0.0, 50.0);
        b.close_path();
        assert!(rects_from_paths(&[b.finish(true, false, 1.0)], 100.0).is_empty());
    }

    #[test]
    fn curves_are_rejected() {
        let mut b = PathBuilder::new(Ctm::identity());
        b.move_to(0.0, 0.0);
        b.curve_to(1.0, 1.0, 2.0, 2.0, 3.0, 0.0);
        b.close_path();
        assert!(rects_from_paths(&[b.finish(true, true, 1.0)], 100.0).is_empty());
    }

    #[test]
    fn multiple_subpaths_yield_multiple_rects() {
        let mut b = PathBuilder::new(Ctm::identity());
        b.rectangle(0.0, 0.0, 10.0, 10.0);
        b.rectangle(20.0, 20.0, 10.0, 10.0);
        let rects = rects_from_paths(&[b.finish(false, true, 0.0)], 100.0);
        assert_eq!(rects.len(), 2);
    }

    #[test]
    fn unpainted_paths_are_ignored() {
        let mut b = PathBuilder::new(Ctm::identity());
        b.rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(rects_from_paths(&[b.finish(false, false, 1.0)], 100.0).is_empty());
    }
}

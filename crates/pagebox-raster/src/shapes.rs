//! Pixel-space rectangles and minimum-area rotated rectangles.

use std::cmp::Ordering;

/// Axis-aligned pixel rectangle, `x0..x1` by `y0..y1` (end-exclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle covering whole pixels `min..=max` in each axis.
    pub fn from_inclusive(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self::new(
            f64::from(min_x),
            f64::from(min_y),
            f64::from(max_x) + 1.0,
            f64::from(max_y) + 1.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }
}

/// A rectangle of minimum area enclosing a point set, possibly rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedBox {
    pub center: (f64, f64),
    /// Side lengths along the rectangle's own axes.
    pub width: f64,
    pub height: f64,
    /// Rotation of the `width` side, in degrees.
    pub angle: f64,
    /// Axis-aligned hull of the four corners.
    pub aabb: PixelRect,
}

impl RotatedBox {
    /// Long side over short side; `f64::INFINITY` for a flat box.
    pub fn aspect_ratio(&self) -> f64 {
        let long = self.width.max(self.height);
        let short = self.width.min(self.height);
        if short <= 0.0 { f64::INFINITY } else { long / short }
    }
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Convex hull by Andrew's monotone chain, counter-clockwise.
fn convex_hull(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<(f64, f64)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<(f64, f64)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Minimum-area enclosing rectangle of pixel centers, grown by half a pixel
/// on each side so that a filled `w x h` block measures `w x h`.
///
/// Returns `None` for an empty point set. Collinear input yields a box of
/// thickness one pixel.
pub fn min_area_rect(points: &[(f64, f64)]) -> Option<RotatedBox> {
    let hull = convex_hull(points);
    if hull.is_empty() {
        return None;
    }

    // Candidate orientations are the hull edges; a degenerate hull is
    // measured axis-aligned.
    // (area, angle, min_u, max_u, min_v, max_v)
    let mut best: Option<(f64, f64, f64, f64, f64, f64)> = None;
    let edges = if hull.len() >= 3 { hull.len() } else { 1 };
    for i in 0..edges {
        let (ux, uy) = if hull.len() >= 3 {
            let a = hull[i];
            let b = hull[(i + 1) % hull.len()];
            let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
            if len == 0.0 {
                continue;
            }
            ((b.0 - a.0) / len, (b.1 - a.1) / len)
        } else {
            (1.0, 0.0)
        };
        let (mut min_u, mut max_u, mut min_v, mut max_v) =
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for &(x, y) in &hull {
            let u = x * ux + y * uy;
            let v = -x * uy + y * ux;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
        let area = (max_u - min_u + 1.0) * (max_v - min_v + 1.0);
        let angle = uy.atan2(ux);
        if best.is_none_or(|b| area < b.0 - 1e-9) {
            best = Some((area, angle, min_u, max_u, min_v, max_v));
        }
    }

    let (_, angle, min_u, max_u, min_v, max_v) = best?;
    let (ux, uy) = (angle.cos(), angle.sin());
    let (min_u, max_u, min_v, max_v) = (min_u - 0.5, max_u + 0.5, min_v - 0.5, max_v + 0.5);

    let corner = |u: f64, v: f64| (u * ux - v * uy, u * uy + v * ux);
    let corners = [
        corner(min_u, min_v),
        corner(max_u, min_v),
        corner(max_u, max_v),
        corner(min_u, max_v),
    ];
    let aabb = corners.iter().fold(
        PixelRect::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |r, &(x, y)| PixelRect::new(r.x0.min(x), r.y0.min(y), r.x1.max(x), r.y1.max(y)),
    );
    let (cu, cv) = ((min_u + max_u) / 2.0, (min_v + max_v) / 2.0);

    Some(RotatedBox {
        center: corner(cu, cv),
        width: max_u - min_u,
        height: max_v - min_v,
        angle: angle.to_degrees(),
        aabb,
    })
}

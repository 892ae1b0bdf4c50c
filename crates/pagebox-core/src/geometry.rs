/// Bounding box in page points with a top-left origin.
///
/// Coordinates follow the page-point convention used throughout pagebox:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// A usable box has `x1 > x0` and `bottom > top`; see [`BBox::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Build a box from two corners given in any order.
    pub fn from_corners(xa: f64, ya: f64, xb: f64, yb: f64) -> Self {
        Self {
            x0: xa.min(xb),
            top: ya.min(yb),
            x1: xa.max(xb),
            bottom: ya.max(yb),
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// `true` when the box has strictly positive width and height.
    pub fn is_valid(&self) -> bool {
        self.x1 > self.x0 && self.bottom > self.top
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Grow the box by `dx` on the left and right and `dy` on the top and bottom.
    ///
    /// Negative values shrink it.
    pub fn expand(&self, dx: f64, dy: f64) -> BBox {
        BBox {
            x0: self.x0 - dx,
            top: self.top - dy,
            x1: self.x1 + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Clip the box to `bounds`. The result may be invalid if they do not overlap.
    pub fn clamp_to(&self, bounds: &BBox) -> BBox {
        BBox {
            x0: self.x0.max(bounds.x0),
            top: self.top.max(bounds.top),
            x1: self.x1.min(bounds.x1),
            bottom: self.bottom.min(bounds.bottom),
        }
    }

    /// `true` when the two boxes share a region of positive area.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 < other.x1
            && other.x0 < self.x1
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// `true` when `inner` lies inside `self`, allowing `tolerance` points of overhang.
    pub fn contains(&self, inner: &BBox, tolerance: f64) -> bool {
        inner.x0 >= self.x0 - tolerance
            && inner.x1 <= self.x1 + tolerance
            && inner.top >= self.top - tolerance
            && inner.bottom <= self.bottom + tolerance
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &BBox, eps: f64) -> bool {
        (self.x0 - other.x0).abs() <= eps
            && (self.top - other.top).abs() <= eps
            && (self.x1 - other.x1).abs() <= eps
            && (self.bottom - other.bottom).abs() <= eps
    }
}

/// A 2D point in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Current transformation matrix `[a b c d e f]`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// `self` applied after `other`, i.e. the matrix product `other × self`.
    ///
    /// This is the composition performed by the `cm` operator, where `other`
    /// is the newly concatenated matrix and `self` the current CTM.
    pub fn pre_concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: other.a * self.a + other.b * self.c,
            b: other.a * self.b + other.b * self.d,
            c: other.c * self.a + other.d * self.c,
            d: other.c * self.b + other.d * self.d,
            e: other.e * self.a + other.f * self.c + self.e,
            f: other.e * self.b + other.f * self.d + self.f,
        }
    }
}

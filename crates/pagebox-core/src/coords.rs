//! Conversion between top-left page points and bottom-left engine space.
//!
//! The detectors work in top-left page points ([`BBox`]). The external
//! structure engine and raw PDF content streams report boxes measured from
//! the bottom of the page; [`BottomLeftBox`] carries those values and the
//! two functions here flip between the spaces.

use crate::geometry::BBox;

/// A box whose `top` and `bottom` are measured upward from the page bottom.
///
/// Field order and naming mirror what structure engines emit
/// (`left`/`top`/`right`/`bottom`). No ordering of `top` and `bottom` is
/// assumed; engines disagree on it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BottomLeftBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BottomLeftBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Flip a bottom-left-origin box into top-left page points.
///
/// Each y is mapped by `y' = page_height - y` and the result is normalized so
/// that `top < bottom` and `x0 < x1` whatever order the input used.
pub fn to_top_left(b: BottomLeftBox, page_height: f64) -> BBox {
    debug_assert!(page_height > 0.0, "page height must be positive");
    BBox::from_corners(
        b.left,
        page_height - b.top,
        b.right,
        page_height - b.bottom,
    )
}

/// Inverse of [`to_top_left`].
///
/// The returned box has `top >= bottom` (the top edge is higher on the page).
pub fn to_bottom_left(b: BBox, page_height: f64) -> BottomLeftBox {
    debug_assert!(page_height > 0.0, "page height must be positive");
    BottomLeftBox {
        left: b.x0,
        top: page_height - b.top,
        right: b.x1,
        bottom: page_height - b.bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_y_axis() {
        let b = to_top_left(BottomLeftBox::new(10.0, 700.0, 110.0, 650.0), 792.0);
        assert_eq!(b, BBox::new(10.0, 92.0, 110.0, 142.0));
    }

    #[test]
    fn normalizes_swapped_input() {
        let a = to_top_left(BottomLeftBox::new(110.0, 650.0, 10.0, 700.0), 792.0);
        let b = to_top_left(BottomLeftBox::new(10.0, 700.0, 110.0, 650.0), 792.0);
        assert_eq!(a, b);
        assert!(a.top < a.bottom);
    }

    #[test]
    fn round_trips_within_tolerance() {
        let boxes = [
            BBox::new(0.0, 0.0, 612.0, 792.0),
            BBox::new(48.25, 48.5, 352.125, 252.75),
            BBox::new(300.1, 10.3, 300.2, 10.4),
        ];
        for h in [792.0, 841.89, 1.0e3] {
            for b in boxes {
                let back = to_top_left(to_bottom_left(b, h), h);
                assert!(back.approx_eq(&b, 1e-6), "{b:?} -> {back:?} at h={h}");
            }
        }
    }

    #[test]
    fn bottom_left_top_is_higher() {
        let bl = to_bottom_left(BBox::new(0.0, 100.0, 10.0, 200.0), 792.0);
        assert_eq!(bl.top, 692.0);
        assert_eq!(bl.bottom, 592.0);
    }
}

//! Long near-horizontal line segments, such as fraction bars.
//!
//! Each row is scanned for ink runs that tolerate short gaps; runs at least
//! `min_length` long are kept, and runs on adjacent rows that overlap
//! horizontally are grouped into one segment. A segment never spans more
//! than `max_thickness` rows, which keeps it near zero slope.

use image::GrayImage;

use crate::binarize::INK;

/// A horizontal segment covering rows `y0..=y1` and columns `x0..=x1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

/// Parameters of [`horizontal_segments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOptions {
    /// Minimum run length in pixels.
    pub min_length: u32,
    /// Largest gap (in pixels) bridged inside one run.
    pub max_gap: u32,
    /// Largest number of rows grouped into one segment.
    pub max_thickness: u32,
}

fn row_runs(mask: &GrayImage, y: u32, options: &SegmentOptions) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut current: Option<(u32, u32)> = None;
    for x in 0..mask.width() {
        if mask.get_pixel(x, y)[0] != INK {
            continue;
        }
        current = match current {
            Some((start, end)) if x - end - 1 <= options.max_gap => Some((start, x)),
            Some(run) => {
                runs.push(run);
                Some((x, x))
            }
            None => Some((x, x)),
        };
    }
    runs.extend(current);
    runs.retain(|&(a, b)| b - a + 1 >= options.min_length);
    runs
}

/// Detect near-horizontal segments in `mask`, top to bottom.
pub fn horizontal_segments(mask: &GrayImage, options: &SegmentOptions) -> Vec<Segment> {
    let mut done: Vec<Segment> = Vec::new();
    let mut open: Vec<Segment> = Vec::new();

    for y in 0..mask.height() {
        let mut next_open = Vec::new();
        for (x0, x1) in row_runs(mask, y, options) {
            let joined = open.iter().position(|s| {
                s.y1 + 1 == y && x0 <= s.x1 && s.x0 <= x1 && y - s.y0 < options.max_thickness
            });
            match joined {
                Some(i) => {
                    let mut seg = open.swap_remove(i);
                    seg.x0 = seg.x0.min(x0);
                    seg.x1 = seg.x1.max(x1);
                    seg.y1 = y;
                    next_open.push(seg);
                }
                None => next_open.push(Segment { x0, x1, y0: y, y1: y }),
            }
        }
        done.append(&mut open);
        open = next_open;
    }
    done.append(&mut open);
    done.sort_by_key(|s| (s.y0, s.x0));
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn opts(min_length: u32) -> SegmentOptions {
        SegmentOptions {
            min_length,
            max_gap: 2,
            max_thickness: 4,
        }
    }

    #[test]
    fn finds_a_bar_and_ignores_short_glyphs() {
        let mut mask = GrayImage::new(100, 40);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 20).of_size(60, 2), Luma([INK]));
        draw_filled_rect_mut(&mut mask, Rect::at(10, 5).of_size(8, 8), Luma([INK]));

        let segs = horizontal_segments(&mask, &opts(30));
        assert_eq!(segs, vec![Segment { x0: 10, x1: 69, y0: 20, y1: 21 }]);
    }

    #[test]
    fn small_gaps_are_bridged() {
        let mut mask = GrayImage::new(100, 10);
        draw_filled_rect_mut(&mut mask, Rect::at(0, 3).of_size(20, 1), Luma([INK]));
        draw_filled_rect_mut(&mut mask, Rect::at(22, 3).of_size(20, 1), Luma([INK]));
        let segs = horizontal_segments(&mask, &opts(30));
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].x0, segs[0].x1), (0, 41));
    }

    #[test]
    fn thick_blocks_split_by_thickness() {
        let mut mask = GrayImage::new(50, 20);
        draw_filled_rect_mut(&mut mask, Rect::at(0, 0).of_size(40, 10), Luma([INK]));
        let segs = horizontal_segments(&mask, &opts(30));
        assert!(segs.iter().all(|s| s.y1 - s.y0 < 4));
        assert_eq!(segs.len(), 3);
    }
}

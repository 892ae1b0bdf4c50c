//! Ink projection profiles and run analysis.
//!
//! A profile counts ink pixels per row (or per column). Runs are maximal
//! stretches of the profile above a fraction of its peak; nearby runs can be
//! merged so that stacked lines of one multi-line expression form one span.

use std::ops::Range;

use image::GrayImage;

use crate::binarize::INK;

/// A run of consecutive profile indices, `start..=end`, with its summed ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: u32,
    /// Inclusive.
    pub end: u32,
    pub mass: u64,
}

/// Ink pixels per row.
pub fn row_profile(mask: &GrayImage) -> Vec<u64> {
    let mut profile = vec![0u64; mask.height() as usize];
    for (_, y, p) in mask.enumerate_pixels() {
        if p[0] == INK {
            profile[y as usize] += 1;
        }
    }
    profile
}

/// Ink pixels per column, counting only rows in `rows`.
pub fn column_profile(mask: &GrayImage, rows: Range<u32>) -> Vec<u64> {
    let mut profile = vec![0u64; mask.width() as usize];
    let rows = rows.start.min(mask.height())..rows.end.min(mask.height());
    for y in rows {
        for x in 0..mask.width() {
            if mask.get_pixel(x, y)[0] == INK {
                profile[x as usize] += 1;
            }
        }
    }
    profile
}

fn threshold(profile: &[u64], fraction: f64) -> Option<f64> {
    let peak = profile.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        return None;
    }
    Some(peak as f64 * fraction)
}

/// Maximal runs of indices whose value exceeds `fraction` of the peak.
///
/// An all-zero profile has no runs.
pub fn runs_above(profile: &[u64], fraction: f64) -> Vec<Run> {
    let Some(limit) = threshold(profile, fraction) else {
        return Vec::new();
    };
    let mut runs = Vec::new();
    let mut current: Option<Run> = None;
    for (i, &v) in profile.iter().enumerate() {
        let i = i as u32;
        if v as f64 > limit {
            match current.as_mut() {
                Some(run) => {
                    run.end = i;
                    run.mass += v;
                }
                None => {
                    current = Some(Run {
                        start: i,
                        end: i,
                        mass: v,
                    })
                }
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);
    runs
}

/// Merge runs separated by at most `max_gap` indices.
pub fn merge_runs(runs: &[Run], max_gap: u32) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for &run in runs {
        match merged.last_mut() {
            Some(last) if run.start.saturating_sub(last.end + 1) <= max_gap => {
                last.end = last.end.max(run.end);
                last.mass += run.mass;
            }
            _ => merged.push(run),
        }
    }
    merged
}

/// The run carrying the most ink; the earliest one wins a tie.
pub fn dominant_run(runs: &[Run]) -> Option<Run> {
    runs.iter()
        .copied()
        .fold(None, |best: Option<Run>, run| match best {
            Some(b) if b.mass >= run.mass => Some(b),
            _ => Some(run),
        })
}

/// First index whose value exceeds `fraction` of the peak.
pub fn first_above(profile: &[u64], fraction: f64) -> Option<u32> {
    let limit = threshold(profile, fraction)?;
    profile
        .iter()
        .position(|&v| v as f64 > limit)
        .map(|i| i as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn bands(rows: &[(u32, u32)], height: usize) -> Vec<u64> {
        let mut p = vec![0u64; height];
        for &(a, b) in rows {
            for v in &mut p[a as usize..=b as usize] {
                *v = 50;
            }
        }
        p
    }

    #[test]
    fn runs_are_found_above_fraction() {
        let mut p = bands(&[(10, 20), (25, 35)], 50);
        p[3] = 2; // under 5% of 50
        let runs = runs_above(&p, 0.05);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (10, 20));
        assert_eq!((runs[1].start, runs[1].end), (25, 35));
        assert_eq!(runs[0].mass, 11 * 50);
    }

    #[test]
    fn four_row_gap_merges() {
        let runs = runs_above(&bands(&[(10, 20), (25, 35)], 50), 0.05);
        let merged = merge_runs(&runs, 6);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (10, 35));
    }

    #[test]
    fn ten_row_gap_stays_split() {
        let runs = runs_above(&bands(&[(10, 20), (31, 45)], 60), 0.05);
        let merged = merge_runs(&runs, 6);
        assert_eq!(merged.len(), 2);
        let best = dominant_run(&merged).unwrap();
        assert_eq!((best.start, best.end), (31, 45));
    }

    #[test]
    fn dominant_tie_prefers_earliest() {
        let runs = [
            Run { start: 0, end: 4, mass: 10 },
            Run { start: 9, end: 13, mass: 10 },
        ];
        assert_eq!(dominant_run(&runs).unwrap().start, 0);
        assert_eq!(dominant_run(&[]), None);
    }

    #[test]
    fn run_ending_at_profile_end_is_kept() {
        let runs = runs_above(&[0, 0, 5, 5], 0.05);
        assert_eq!(runs, vec![Run { start: 2, end: 3, mass: 10 }]);
        assert_eq!(runs[0].end - runs[0].start, 1);
    }

    #[test]
    fn empty_profile() {
        assert!(runs_above(&[0, 0, 0], 0.05).is_empty());
        assert_eq!(first_above(&[], 0.03), None);
    }

    #[test]
    fn profiles_from_mask() {
        let mut mask = GrayImage::new(30, 20);
        draw_filled_rect_mut(&mut mask, Rect::at(5, 2).of_size(10, 3), Luma([INK]));
        draw_filled_rect_mut(&mut mask, Rect::at(20, 12).of_size(4, 4), Luma([INK]));

        let rows = row_profile(&mask);
        assert_eq!(rows[3], 10);
        assert_eq!(rows[13], 4);

        let cols = column_profile(&mask, 10..20);
        assert_eq!(cols[5], 0);
        assert_eq!(cols[21], 4);
        assert_eq!(first_above(&cols, 0.03), Some(20));
        assert_eq!(first_above(&column_profile(&mask, 0..20), 0.03), Some(5));
    }
}

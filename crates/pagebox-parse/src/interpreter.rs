//! Path interpreter for content streams.
//!
//! Tracks the graphics-state stack (CTM and line width) and turns path
//! construction plus painting operators into painted [`Path`]s. Text,
//! images and form XObjects are not followed.

use pagebox_core::{Ctm, Path, PathBuilder};

use crate::tokenizer::Operator;

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Ctm,
    line_width: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Ctm::identity(),
            line_width: 1.0,
        }
    }
}

/// Interpret `ops` and return every painted path in user space.
///
/// Operators with the wrong operand count are skipped, as viewers do.
pub fn interpret_paths(ops: &[Operator]) -> Vec<Path> {
    let mut state = GraphicsState::default();
    let mut saved: Vec<GraphicsState> = Vec::new();
    let mut builder = PathBuilder::new(state.ctm);
    let mut paths = Vec::new();

    for op in ops {
        match op.name.as_str() {
            "q" => saved.push(state),
            "Q" => {
                if let Some(prev) = saved.pop() {
                    state = prev;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = op.numbers::<6>() {
                    state.ctm = state.ctm.pre_concat(&Ctm::new(a, b, c, d, e, f));
                }
            }
            "w" => {
                if let Some([w]) = op.numbers::<1>() {
                    state.line_width = w;
                }
            }
            "m" => {
                if let Some([x, y]) = op.numbers::<2>() {
                    builder.set_ctm(state.ctm);
                    builder.move_to(x, y);
                }
            }
            "l" => {
                if let Some([x, y]) = op.numbers::<2>() {
                    builder.set_ctm(state.ctm);
                    builder.line_to(x, y);
                }
            }
            "c" => {
                if let Some([x1, y1, x2, y2, x3, y3]) = op.numbers::<6>() {
                    builder.set_ctm(state.ctm);
                    builder.curve_to(x1, y1, x2, y2, x3, y3);
                }
            }
            "v" => {
                if let Some([x2, y2, x3, y3]) = op.numbers::<4>() {
                    builder.set_ctm(state.ctm);
                    builder.curve_to_v(x2, y2, x3, y3);
                }
            }
            "y" => {
                if let Some([x1, y1, x3, y3]) = op.numbers::<4>() {
                    builder.set_ctm(state.ctm);
                    builder.curve_to_y(x1, y1, x3, y3);
                }
            }
            "h" => builder.close_path(),
            "re" => {
                if let Some([x, y, w, h]) = op.numbers::<4>() {
                    builder.set_ctm(state.ctm);
                    builder.rectangle(x, y, w, h);
                }
            }
            "S" => paint(&mut builder, &mut paths, true, false, state.line_width),
            "s" => {
                builder.close_path();
                paint(&mut builder, &mut paths, true, false, state.line_width);
            }
            "f" | "F" | "f*" => paint(&mut builder, &mut paths, false, true, state.line_width),
            "B" | "B*" => paint(&mut builder, &mut paths, true, true, state.line_width),
            "b" | "b*" => {
                builder.close_path();
                paint(&mut builder, &mut paths, true, true, state.line_width);
            }
            "n" => builder.discard(),
            _ => {}
        }
    }

    paths
}

fn paint(builder: &mut PathBuilder, paths: &mut Vec<Path>, stroke: bool, fill: bool, width: f64) {
    if builder.is_empty() {
        return;
    }
    paths.push(builder.finish(stroke, fill, width));
}

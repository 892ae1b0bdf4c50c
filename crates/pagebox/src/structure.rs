//! Document-structure engine seam and cell-box extraction.
//!
//! The engine's response is loosely typed JSON whose cell schema differs
//! between versions. [`extract_cell_boxes`] is the single place that knows
//! the variants; everything downstream sees top-left [`BBox`]es.

use std::path::PathBuf;
use std::process::Command;

use pagebox_core::{BBox, BottomLeftBox, to_top_left};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

/// Error returned by a [`StructureEngine`].
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("structure engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("structure engine failed: {0}")]
    Failed(String),

    #[error("structure engine returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single-page PDF whose page is `width` x `height` points, one point per
/// pixel of the raster it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticDocument {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Converts a document into tables and cells.
///
/// The response must contain `tables`, each with cells carrying bounding
/// boxes in bottom-left page points unless marked otherwise.
pub trait StructureEngine {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    fn convert(&self, document: &SyntheticDocument) -> Result<Value, StructureError>;
}

impl<T: StructureEngine + ?Sized> StructureEngine for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn convert(&self, document: &SyntheticDocument) -> Result<Value, StructureError> {
        (**self).convert(document)
    }
}

/// Runs an external program on the synthetic PDF and reads JSON from its
/// standard output.
///
/// The PDF path is appended after `args`.
#[derive(Debug, Clone)]
pub struct CommandStructureEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandStructureEngine {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl StructureEngine for CommandStructureEngine {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("structure-command")
    }

    fn is_available(&self) -> bool {
        self.program.is_file() || which::which(&self.program).is_ok()
    }

    fn convert(&self, document: &SyntheticDocument) -> Result<Value, StructureError> {
        let file = tempfile::Builder::new()
            .prefix("pagebox-roi-")
            .suffix(".pdf")
            .tempfile()?;
        std::fs::write(file.path(), &document.bytes)?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StructureError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

const CELL_LIST_PATHS: [&[&str]; 3] = [&["table_cells"], &["cells"], &["data", "table_cells"]];
const CELL_BOX_KEYS: [&str; 3] = ["bbox", "box", "rect"];

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(key))
}

fn num(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn is_top_left(obj: &Value) -> bool {
    obj.get("coord_origin")
        .and_then(Value::as_str)
        .is_some_and(|o| o.eq_ignore_ascii_case("TOPLEFT"))
}

/// Read one cell box, converting to top-left page points.
fn cell_box(cell: &Value, page_height: f64) -> Option<BBox> {
    let raw = CELL_BOX_KEYS.iter().find_map(|k| cell.get(*k))?;
    let top_left = is_top_left(raw) || is_top_left(cell);

    let [a, b, c, d] = if let Some(items) = raw.as_array() {
        if items.len() != 4 {
            return None;
        }
        let mut out = [0.0; 4];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item.as_f64()?;
        }
        out
    } else {
        [["l", "t", "r", "b"], ["left", "top", "right", "bottom"], ["x0", "y0", "x1", "y1"]]
            .iter()
            .find_map(|keys| {
                Some([
                    num(raw, keys[0])?,
                    num(raw, keys[1])?,
                    num(raw, keys[2])?,
                    num(raw, keys[3])?,
                ])
            })?
    };

    let bbox = if top_left {
        BBox::from_corners(a, b, c, d)
    } else {
        to_top_left(BottomLeftBox::new(a, b, c, d), page_height)
    };
    bbox.is_valid().then_some(bbox)
}

/// Every table-cell box in a structure-engine response, in top-left page
/// points of a page `page_height` points tall.
///
/// Tables are read from `tables`; cells from the first of `table_cells`,
/// `cells` or `data.table_cells` that is an array; each cell's box from
/// `bbox`, `box` or `rect`. Unreadable cells are skipped.
pub fn extract_cell_boxes(response: &Value, page_height: f64) -> Vec<BBox> {
    let Some(tables) = response.get("tables").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut boxes = Vec::new();
    for table in tables {
        let Some(cells) = CELL_LIST_PATHS
            .iter()
            .find_map(|path| lookup(table, path).and_then(Value::as_array))
        else {
            continue;
        };
        boxes.extend(cells.iter().filter_map(|cell| cell_box(cell, page_height)));
    }
    trace!(tables = tables.len(), cells = boxes.len(), "extracted cell boxes");
    boxes
}

/// Smallest box containing every box in `boxes`.
pub fn envelope(boxes: &[BBox]) -> Option<BBox> {
    let (first, rest) = boxes.split_first()?;
    Some(rest.iter().fold(*first, |acc, b| acc.union(b)))
}

//! lopdf-based page handles.
//!
//! [`LopdfDocument`] opens a PDF with [lopdf](https://crates.io/crates/lopdf);
//! each [`LopdfPage`] implements [`PageSource`] by resolving the page's
//! MediaBox and interpreting its content streams for vector paths.

use pagebox_core::{PageError, PageSource, Path};
use tracing::trace;

use crate::error::BackendError;
use crate::interpreter::interpret_paths;
use crate::tokenizer::tokenize;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page ObjectIds in page order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    /// Parse a PDF from memory. Encrypted documents are rejected.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        if inner.is_encrypted() {
            return Err(BackendError::Parse("document is encrypted".into()));
        }
        // get_pages returns BTreeMap<u32, ObjectId> keyed by 1-based page number
        let page_ids = inner.get_pages().values().copied().collect();
        Ok(Self { inner, page_ids })
    }

    /// Read and parse a PDF file.
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Handle for the page at `index` (0-based).
    pub fn page(&self, index: usize) -> Result<LopdfPage<'_>, BackendError> {
        let object_id = *self.page_ids.get(index).ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                self.page_ids.len()
            ))
        })?;
        Ok(LopdfPage {
            doc: &self.inner,
            object_id,
            index,
        })
    }
}

/// A single page of a [`LopdfDocument`].
#[derive(Clone, Copy)]
pub struct LopdfPage<'a> {
    doc: &'a lopdf::Document,
    object_id: lopdf::ObjectId,
    index: usize,
}

impl std::fmt::Debug for LopdfPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfPage")
            .field("index", &self.index)
            .field("object_id", &self.object_id)
            .finish()
    }
}

impl LopdfPage<'_> {
    /// The MediaBox as `[x0, y0, x1, y1]` in user space, following `/Parent`
    /// inheritance.
    pub fn media_box(&self) -> Result<[f64; 4], BackendError> {
        let obj = resolve_inherited(self.doc, self.object_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        let obj = resolve_ref(self.doc, obj);
        let array = obj
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        if array.len() != 4 {
            return Err(BackendError::Parse(format!(
                "expected 4-element MediaBox, got {}",
                array.len()
            )));
        }
        let mut out = [0.0; 4];
        for (slot, item) in out.iter_mut().zip(array) {
            *slot = object_to_f64(resolve_ref(self.doc, item))?;
        }
        Ok(out)
    }

    /// Concatenated, decompressed content stream bytes.
    pub fn content_bytes(&self) -> Result<Vec<u8>, BackendError> {
        let dict = self
            .doc
            .get_object(self.object_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let contents = match dict.get(b"Contents") {
            Ok(obj) => resolve_ref(self.doc, obj),
            Err(_) => return Ok(Vec::new()),
        };
        let streams: Vec<&lopdf::Object> = match contents {
            lopdf::Object::Array(items) => items.iter().map(|o| resolve_ref(self.doc, o)).collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in streams {
            let stream = obj
                .as_stream()
                .map_err(|e| BackendError::Parse(format!("/Contents entry is not a stream: {e}")))?;
            let bytes = if stream.dict.get(b"Filter").is_ok() {
                stream.decompressed_content().map_err(|e| {
                    BackendError::Parse(format!("failed to decompress content stream: {e}"))
                })?
            } else {
                stream.content.clone()
            };
            if !content.is_empty() {
                content.push(b'\n');
            }
            content.extend_from_slice(&bytes);
        }
        Ok(content)
    }
}

impl PageSource for LopdfPage<'_> {
    fn page_number(&self) -> usize {
        self.index
    }

    fn size(&self) -> Result<(f64, f64), PageError> {
        let [x0, y0, x1, y1] = self.media_box()?;
        Ok(((x1 - x0).abs(), (y1 - y0).abs()))
    }

    /// Paths are shifted so that the MediaBox origin is `(0, 0)`.
    fn drawings(&self) -> Result<Vec<Path>, PageError> {
        let [x0, y0, x1, y1] = self.media_box()?;
        let (ox, oy) = (x0.min(x1), y0.min(y1));
        let ops = tokenize(&self.content_bytes()?)?;
        let mut paths = interpret_paths(&ops);
        if ox != 0.0 || oy != 0.0 {
            for path in &mut paths {
                shift_path(path, -ox, -oy);
            }
        }
        trace!(
            page = self.index,
            operators = ops.len(),
            paths = paths.len(),
            "interpreted page paths"
        );
        Ok(paths)
    }
}

fn shift_path(path: &mut Path, dx: f64, dy: f64) {
    use pagebox_core::PathSegment;
    let shift = |p: &mut pagebox_core::Point| {
        p.x += dx;
        p.y += dy;
    };
    for seg in &mut path.segments {
        match seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => shift(p),
            PathSegment::CurveTo { cp1, cp2, end } => {
                shift(cp1);
                shift(cp2);
                shift(end);
            }
            PathSegment::ClosePath => {}
        }
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Look up a key on the page, walking up `/Parent` links if absent.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded walk: a malformed tree could contain a /Parent cycle.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree /Parent chain too deep".into()))
}

//! pagebox-parse: lopdf-backed page acquisition.
//!
//! - [`LopdfDocument`] / [`LopdfPage`]: open a PDF and expose each page as a
//!   [`PageSource`](pagebox_core::PageSource) (page size and vector paths).
//! - [`tokenize`] / [`interpret_paths`]: content stream tokenizer and path
//!   interpreter used by the page handle.
//! - [`write_image_document`]: build the synthetic one-page image PDF used
//!   for region refinement.

pub mod document;
pub mod error;
pub mod interpreter;
pub mod tokenizer;
pub mod writer;

pub use document::{LopdfDocument, LopdfPage};
pub use error::BackendError;
pub use interpreter::interpret_paths;
pub use tokenizer::{Operand, Operator, tokenize};
pub use writer::write_image_document;

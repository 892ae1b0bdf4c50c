//! Error types for the parsing layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps lopdf failures and converts them to [`PageError`].

use pagebox_core::PageError;
use thiserror::Error;

/// Error type for lopdf backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// Error while building a PDF document.
    #[error("write error: {0}")]
    Write(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PageError),
}

impl From<BackendError> for PageError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) | BackendError::Interpreter(msg) => {
                PageError::Acquisition(msg)
            }
            BackendError::Io(e) => PageError::Acquisition(e.to_string()),
            BackendError::Write(msg) => PageError::Other(msg),
            BackendError::Core(e) => e,
        }
    }
}

//! Error and warning types for page acquisition.
//!
//! Provides [`PageError`] for failures reported by a [`PageSource`](crate::PageSource)
//! and [`AcquireWarning`] for the non-fatal record left behind when a
//! [`PageContext`](crate::PageContext) field degrades to empty.

use std::fmt;

/// Error reported while reading primitives from a page handle.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// The page content could not be read or interpreted.
    Acquisition(String),
    /// The page geometry is unusable (e.g. non-positive size).
    Geometry(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Acquisition(msg) => write!(f, "acquisition error: {msg}"),
            PageError::Geometry(msg) => write!(f, "geometry error: {msg}"),
            PageError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PageError {}

/// Which [`PageContext`](crate::PageContext) field a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcquireField {
    TextRuns,
    Words,
    Drawings,
    Hints,
}

impl AcquireField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquireField::TextRuns => "text_runs",
            AcquireField::Words => "words",
            AcquireField::Drawings => "drawings",
            AcquireField::Hints => "hints",
        }
    }
}

impl fmt::Display for AcquireField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that fell back to an empty collection during acquisition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcquireWarning {
    pub field: AcquireField,
    pub description: String,
}

impl fmt::Display for AcquireWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} degraded to empty: {}", self.field, self.description)
    }
}

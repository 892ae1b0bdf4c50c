//! Project configuration loaded from `pagebox.toml`.
//!
//! Every table and field is optional; anything missing keeps its default.
//!
//! ```toml
//! [ocr]
//! tesseract_cmd = "/opt/tesseract/bin/tesseract"
//! lang = "eng"
//!
//! [frame]
//! min_width = 100.0
//!
//! [region]
//! dpi = 300
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchor::AnchorOptions;
use crate::frame::FrameOptions;
use crate::region::RegionOptions;
use crate::tighten::TightenOptions;

/// File name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "pagebox.toml";

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// OCR settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to the `tesseract` executable.
    pub tesseract_cmd: Option<PathBuf>,
    /// Tesseract language code(s), e.g. `"eng"` or `"eng+deu"`.
    pub lang: String,
    /// Override for the page segmentation mode passed as `--psm`.
    pub psm: Option<u8>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: None,
            lang: "eng".to_string(),
            psm: None,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageboxConfig {
    pub ocr: OcrConfig,
    pub frame: FrameOptions,
    pub tighten: TightenOptions,
    pub anchor: AnchorOptions,
    pub region: RegionOptions,
}

impl PageboxConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load `pagebox.toml` from `dir` if it exists.
    ///
    /// Returns `Ok(None)` when there is no file; configuration is optional.
    pub fn discover_in(dir: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// [`discover_in`](Self::discover_in) for the current directory.
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        Self::discover_in(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = PageboxConfig::from_toml_str("", Path::new("pagebox.toml")).unwrap();
        assert_eq!(cfg, PageboxConfig::default());
        assert_eq!(cfg.ocr.lang, "eng");
        assert_eq!(cfg.frame.min_width, 120.0);
        assert_eq!(cfg.region.dpi, 200);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let text = r#"
[ocr]
tesseract_cmd = "/opt/tess/bin/tesseract"
psm = 6

[frame]
min_width = 90.0

[tighten]
merge_gap_px = 8
"#;
        let cfg = PageboxConfig::from_toml_str(text, Path::new("pagebox.toml")).unwrap();
        assert_eq!(
            cfg.ocr.tesseract_cmd,
            Some(PathBuf::from("/opt/tess/bin/tesseract"))
        );
        assert_eq!(cfg.ocr.lang, "eng");
        assert_eq!(cfg.ocr.psm, Some(6));
        assert_eq!(cfg.frame.min_width, 90.0);
        assert_eq!(cfg.frame.min_height, 80.0);
        assert_eq!(cfg.tighten.merge_gap_px, 8);
        assert_eq!(cfg.anchor, AnchorOptions::default());
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let err =
            PageboxConfig::from_toml_str("[frame\n", Path::new("x/pagebox.toml")).unwrap_err();
        assert!(err.to_string().starts_with("invalid TOML in x/pagebox.toml"));
    }

    #[test]
    fn discover_reads_file_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PageboxConfig::discover_in(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[region]\ndpi = 300\n").unwrap();
        let cfg = PageboxConfig::discover_in(dir.path()).unwrap().unwrap();
        assert_eq!(cfg.region.dpi, 300);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = PageboxConfig::load("/nonexistent/pagebox.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

//! OCR engine seam.

use std::path::PathBuf;

use image::DynamicImage;
use pagebox_raster::PixelRect;
use thiserror::Error;

/// Error returned by an [`OcrEngine`].
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine is not available")]
    Unavailable,

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image for OCR: {0}")]
    Image(#[from] image::ImageError),

    /// The engine ran but exited unsuccessfully.
    #[error("OCR engine failed: {0}")]
    Failed(String),

    #[error("unreadable OCR output: {0}")]
    Output(String),
}

/// One recognized word.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrToken {
    pub text: String,
    /// Bounds in pixels of the recognized image.
    pub bbox: PixelRect,
    /// Confidence in `[0, 100]`.
    pub confidence: f64,
}

/// Page segmentation hint passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentationMode {
    /// Let the engine find blocks and lines.
    #[default]
    Auto,
    /// Treat the image as a single line of text.
    SingleLine,
    /// Treat the image as a single word.
    SingleWord,
}

/// Turns pixels into positioned words.
pub trait OcrEngine {
    /// Short engine name recorded on results (e.g. `"tesseract"`).
    fn name(&self) -> &str;

    /// Whether the engine can run at all. Implementations should make this
    /// cheap after the first call.
    fn is_available(&self) -> bool;

    fn recognize(
        &self,
        image: &DynamicImage,
        mode: SegmentationMode,
    ) -> Result<Vec<OcrToken>, OcrError>;
}

impl<T: OcrEngine + ?Sized> OcrEngine for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        mode: SegmentationMode,
    ) -> Result<Vec<OcrToken>, OcrError> {
        (**self).recognize(image, mode)
    }
}

/// Inputs to the executable search, in search order.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchInputs {
    /// From the environment variable.
    pub env_cmd: Option<PathBuf>,
    /// From the project configuration file.
    pub config_cmd: Option<PathBuf>,
    /// Standard install locations checked after `PATH` (Windows only).
    pub install_dirs: Vec<PathBuf>,
}

/// Resolve an OCR executable: environment, configuration file, `PATH`,
/// install directories, then the engine's own default lookup.
///
/// Explicit paths must name an existing file to be accepted.
pub(crate) fn resolve_executable(
    inputs: &SearchInputs,
    on_path: impl FnOnce() -> Option<PathBuf>,
    default_lookup: impl FnOnce() -> Option<PathBuf>,
) -> Option<PathBuf> {
    let explicit = [&inputs.env_cmd, &inputs.config_cmd];
    if let Some(found) = explicit.into_iter().flatten().find(|p| p.is_file()) {
        return Some(found.clone());
    }
    if let Some(found) = on_path() {
        return Some(found);
    }
    if let Some(found) = inputs.install_dirs.iter().find(|p| p.is_file()) {
        return Some(found.clone());
    }
    default_lookup()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_wins_over_everything() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join("tess-env");
        let cfg = dir.path().join("tess-cfg");
        std::fs::write(&env, b"").unwrap();
        std::fs::write(&cfg, b"").unwrap();

        let inputs = SearchInputs {
            env_cmd: Some(env.clone()),
            config_cmd: Some(cfg),
            install_dirs: Vec::new(),
        };
        let found = resolve_executable(&inputs, || panic!("PATH not consulted"), || None);
        assert_eq!(found, Some(env));
    }

    #[test]
    fn missing_explicit_paths_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("tess-cfg");
        std::fs::write(&cfg, b"").unwrap();

        let inputs = SearchInputs {
            env_cmd: Some(dir.path().join("does-not-exist")),
            config_cmd: Some(cfg.clone()),
            install_dirs: Vec::new(),
        };
        assert_eq!(resolve_executable(&inputs, || None, || None), Some(cfg));
    }

    #[test]
    fn path_then_install_dirs_then_default() {
        let dir = tempfile::tempdir().unwrap();
        let installed = dir.path().join("Tesseract-OCR").join("tesseract.exe");
        std::fs::create_dir_all(installed.parent().unwrap()).unwrap();
        std::fs::write(&installed, b"").unwrap();

        let inputs = SearchInputs {
            install_dirs: vec![dir.path().join("missing.exe"), installed.clone()],
            ..SearchInputs::default()
        };
        let on_path = PathBuf::from("/usr/bin/tesseract");
        assert_eq!(
            resolve_executable(&inputs, || Some(on_path.clone()), || None),
            Some(on_path.clone())
        );
        assert_eq!(resolve_executable(&inputs, || None, || None), Some(installed));

        let bare = SearchInputs::default();
        assert_eq!(
            resolve_executable(&bare, || None, || Some(PathBuf::from("tesseract"))),
            Some(PathBuf::from("tesseract"))
        );
        assert_eq!(resolve_executable(&bare, || None, || None), None);
    }
}

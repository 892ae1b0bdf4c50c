//! Tesseract command-line OCR engine.
//!
//! The image is written to a temporary PNG and `tesseract <png> stdout -l
//! <lang> --psm <n> tsv` is run; word-level TSV rows become [`OcrToken`]s.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use image::{DynamicImage, ImageFormat};
use pagebox_raster::PixelRect;
use tracing::{debug, trace};

use crate::config::{OcrConfig, PageboxConfig};
use crate::ocr::{OcrEngine, OcrError, OcrToken, SearchInputs, SegmentationMode, resolve_executable};

/// Environment variable naming the tesseract executable.
pub const TESSERACT_ENV: &str = "TESSERACT_CMD";

/// TSV `level` of word rows.
const WORD_LEVEL: u32 = 5;

static TESSERACT_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

fn windows_install_dirs() -> Vec<PathBuf> {
    if !cfg!(windows) {
        return Vec::new();
    }
    let mut dirs = vec![
        PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"),
    ];
    if let Some(local) = std::env::var_os("LOCALAPPDATA") {
        dirs.push(
            PathBuf::from(local)
                .join("Programs")
                .join("Tesseract-OCR")
                .join("tesseract.exe"),
        );
    }
    dirs
}

fn version_succeeds(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Run the executable search with `config_cmd` as the configuration step.
fn search_tesseract(config_cmd: Option<PathBuf>) -> Option<PathBuf> {
    let inputs = SearchInputs {
        env_cmd: std::env::var_os(TESSERACT_ENV).map(PathBuf::from),
        config_cmd,
        install_dirs: windows_install_dirs(),
    };
    let found = resolve_executable(
        &inputs,
        || which::which("tesseract").ok(),
        || {
            let bare = PathBuf::from("tesseract");
            version_succeeds(&bare).then_some(bare)
        },
    );
    debug!(path = ?found, "tesseract lookup finished");
    found
}

/// Locate the tesseract executable once per process.
///
/// `config_cmd` is only consulted by the first call; the answer is frozen
/// afterwards. Engines built with an explicit
/// [`OcrConfig::tesseract_cmd`] resolve their own path instead.
pub fn locate_tesseract(config_cmd: Option<&Path>) -> Option<&'static Path> {
    TESSERACT_PATH
        .get_or_init(|| {
            let config_cmd = config_cmd.map(Path::to_path_buf).or_else(|| {
                match PageboxConfig::discover() {
                    Ok(cfg) => cfg.and_then(|c| c.ocr.tesseract_cmd),
                    Err(err) => {
                        debug!(error = %err, "ignoring unreadable pagebox.toml");
                        None
                    }
                }
            });
            search_tesseract(config_cmd)
        })
        .as_deref()
}

/// OCR through the `tesseract` executable.
///
/// An engine whose configuration names `tesseract_cmd` searches with that
/// path and caches the answer for its own lifetime. Otherwise it shares the
/// process-wide [`locate_tesseract`] result.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    config: OcrConfig,
    executable: OnceLock<Option<PathBuf>>,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            executable: OnceLock::new(),
        }
    }

    /// The executable this engine runs, if any was found.
    pub fn executable(&self) -> Option<&Path> {
        match &self.config.tesseract_cmd {
            Some(cmd) => self
                .executable
                .get_or_init(|| search_tesseract(Some(cmd.clone())))
                .as_deref(),
            None => locate_tesseract(None),
        }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn psm(&self, mode: SegmentationMode) -> u8 {
        self.config.psm.unwrap_or(match mode {
            SegmentationMode::Auto => 3,
            SegmentationMode::SingleLine => 7,
            SegmentationMode::SingleWord => 8,
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        self.executable().is_some()
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        mode: SegmentationMode,
    ) -> Result<Vec<OcrToken>, OcrError> {
        let program = self.executable().ok_or(OcrError::Unavailable)?;

        let file = tempfile::Builder::new()
            .prefix("pagebox-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(file.path(), ImageFormat::Png)?;

        let output = Command::new(program)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.lang)
            .arg("--psm")
            .arg(self.psm(mode).to_string())
            .arg("tsv")
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(stderr.trim().to_string()));
        }

        let tokens = parse_tsv(&String::from_utf8_lossy(&output.stdout))?;
        trace!(count = tokens.len(), "tesseract tokens");
        Ok(tokens)
    }
}

/// Parse tesseract TSV output into word tokens.
///
/// Rows that are not words, have no text, or carry a negative confidence
/// are skipped.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrToken>, OcrError> {
    let mut lines = tsv.lines();
    let header = lines
        .next()
        .ok_or_else(|| OcrError::Output("empty TSV output".into()))?;
    let columns: Vec<&str> = header.split('\t').collect();
    let col = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| OcrError::Output(format!("TSV header has no `{name}` column")))
    };
    let (level, left, top, width, height, conf, text) = (
        col("level")?,
        col("left")?,
        col("top")?,
        col("width")?,
        col("height")?,
        col("conf")?,
        col("text")?,
    );

    let mut tokens = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("");
        if field(level).parse::<u32>().ok() != Some(WORD_LEVEL) {
            continue;
        }
        let word = field(text).trim();
        let confidence: f64 = field(conf).parse().unwrap_or(-1.0);
        if word.is_empty() || confidence < 0.0 {
            continue;
        }
        let num = |i: usize| -> Result<f64, OcrError> {
            field(i)
                .parse::<f64>()
                .map_err(|_| OcrError::Output(format!("bad number in TSV row: {line}")))
        };
        let (x, y, w, h) = (num(left)?, num(top)?, num(width)?, num(height)?);
        tokens.push(OcrToken {
            text: word.to_string(),
            bbox: PixelRect::new(x, y, x + w, y + h),
            confidence: confidence.clamp(0.0, 100.0),
        });
    }
    Ok(tokens)
}

//! qrsheet runtime configuration handling

use crate::error::{Error, Result};
use crate::qr::ErrorCorrection;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrsheetConfig {
    /// Directory conventions shared by both tools
    pub paths: PathOptions,
    /// QR image rendering options
    pub qr: QrOptions,
    /// LaTeX document assembly options
    pub document: DocumentOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl QrsheetConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrsheet.toml / qrsheet.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrsheet.toml", "qrsheet.yaml", "qrsheet.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrsheet");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.paths.apply_env_overrides();
        self.qr.apply_env_overrides();
        self.document.apply_env_overrides();
        self.logging.apply_env_overrides();
    }
}

/// Directory names shared between the generator and the assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Where QR images are written and later collected from
    pub images: PathBuf,
    /// Scratch directory holding the `.tex` source and copied images
    pub workdir: PathBuf,
    /// Final destination of the compiled PDF
    pub pdf: PathBuf,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            images: PathBuf::from("qrcodes"),
            workdir: PathBuf::from("latex"),
            pdf: PathBuf::from("pdf"),
        }
    }
}

impl PathOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("QRSHEET_IMAGE_DIR") {
            self.images = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("QRSHEET_WORK_DIR") {
            self.workdir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("QRSHEET_PDF_DIR") {
            self.pdf = PathBuf::from(dir);
        }
    }
}

/// QR rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Edge length in pixels of a single QR module
    pub module_size: u32,
    /// Surround the symbol with the standard quiet zone
    pub quiet_zone: bool,
    /// Level offered when the user just presses enter
    pub default_level: Option<ErrorCorrection>,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            module_size: 10,
            quiet_zone: true,
            default_level: None,
        }
    }
}

impl QrOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(size) = env::var("QRSHEET_QR_MODULE_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.module_size = parsed.max(1);
            }
        }
        if let Ok(zone) = env::var("QRSHEET_QR_QUIET_ZONE") {
            if let Some(flag) = parse_flag(&zone) {
                self.quiet_zone = flag;
            }
        }
        if let Ok(level) = env::var("QRSHEET_QR_LEVEL") {
            if let Ok(parsed) = level.parse::<ErrorCorrection>() {
                self.default_level = Some(parsed);
            }
        }
    }
}

/// LaTeX document assembly options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Name of the generated LaTeX source inside the working directory
    pub tex_filename: String,
    /// Name of the PDF the compiler produces
    pub pdf_filename: String,
    /// Maximum number of images on one page
    pub images_per_page: usize,
    /// Maximum number of images side by side
    pub max_columns: usize,
    /// Compiler binary, looked up on `PATH` unless it is a path
    pub compiler: String,
    /// Title template; `{date}` is replaced by the formatted current date
    pub title: String,
    /// chrono strftime pattern used for `{date}`
    pub date_format: String,
    /// Vertical gap inserted after every full row
    pub row_spacing: String,
    /// Compiler by-products removed after a successful run
    pub intermediate_extensions: Vec<String>,
    /// Delete the working directory once the PDF has been moved
    pub remove_workdir: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            tex_filename: "qrcode_images.tex".to_string(),
            pdf_filename: "qrcode_images.pdf".to_string(),
            images_per_page: 12,
            max_columns: 4,
            compiler: "pdflatex".to_string(),
            title: "QRコード一覧（{date}）".to_string(),
            date_format: "%Y年%m月%d日".to_string(),
            row_spacing: "0.5cm".to_string(),
            intermediate_extensions: [".aux", ".log", ".out", ".toc"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            remove_workdir: false,
        }
    }
}

impl DocumentOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(compiler) = env::var("QRSHEET_LATEX_COMPILER") {
            if !compiler.trim().is_empty() {
                self.compiler = compiler;
            }
        }
        if let Ok(per_page) = env::var("QRSHEET_IMAGES_PER_PAGE") {
            if let Ok(parsed) = per_page.parse::<usize>() {
                self.images_per_page = parsed.max(1);
            }
        }
        if let Ok(columns) = env::var("QRSHEET_MAX_COLUMNS") {
            if let Ok(parsed) = columns.parse::<usize>() {
                self.max_columns = parsed.max(1);
            }
        }
        if let Ok(title) = env::var("QRSHEET_TITLE") {
            self.title = title;
        }
        if let Ok(remove) = env::var("QRSHEET_REMOVE_WORKDIR") {
            if let Some(flag) = parse_flag(&remove) {
                self.remove_workdir = flag;
            }
        }
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.images_per_page == 0 {
            return Err(Error::Config("images_per_page must be at least 1".into()));
        }
        if self.max_columns == 0 {
            return Err(Error::Config("max_columns must be at least 1".into()));
        }
        if !self.tex_filename.ends_with(".tex") {
            return Err(Error::Config(format!(
                "tex_filename '{}' must end with .tex",
                self.tex_filename
            )));
        }
        Ok(())
    }

    /// File stem shared by the source, the PDF and the intermediates.
    pub fn stem(&self) -> &str {
        self.tex_filename
            .strip_suffix(".tex")
            .unwrap_or(&self.tex_filename)
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSHEET_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRSHEET_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRSHEET_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRSHEET_LOG_COLOR") {
            if let Some(flag) = parse_flag(&color) {
                self.color = flag;
            }
        }
        if let Ok(rotation) = env::var("QRSHEET_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

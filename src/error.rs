//! Error types for qrsheet operations

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias using qrsheet's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrsheet operations
#[derive(Error, Debug)]
pub enum Error {
    /// The image directory to assemble does not exist
    #[error("Image directory '{}' not found", .0.display())]
    ImageDirMissing(PathBuf),

    /// The image directory holds no PNG files
    #[error("No PNG images found in '{}'", .0.display())]
    NoImages(PathBuf),

    /// Unknown error-correction level letter
    #[error("Invalid error-correction level '{0}'. Use one of L, M, Q or H")]
    InvalidErrorCorrection(String),

    /// Nothing to encode
    #[error("QR payload must not be empty")]
    EmptyPayload,

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// The LaTeX compiler binary could not be located
    #[error(
        "LaTeX compiler '{0}' not found. Check that TeX Live or MiKTeX is installed and on PATH"
    )]
    CompilerNotFound(String),

    /// The LaTeX compiler exited unsuccessfully
    #[error("LaTeX compilation failed ({status})")]
    CompileFailed {
        /// Exit status reported by the compiler
        status: ExitStatus,
        /// Captured standard error of the compiler
        stderr: String,
    },

    /// Interactive input ended before a required answer was given
    #[error("Input closed before an answer was given")]
    InputClosed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrEncode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

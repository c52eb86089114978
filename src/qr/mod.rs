//! QR code generation
//!
//! A [`QrRequest`] is built from user input, rendered by [`QrEncoder`] and
//! written to a path picked by [`unique_path`] so that earlier images are never
//! overwritten.

mod encoder;
mod naming;

pub use encoder::QrEncoder;
pub use naming::{unique_path, unique_path_today};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extension of every generated image
pub const IMAGE_EXTENSION: &str = "png";

/// QR symbol redundancy tier, trading capacity for damage resilience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// About 7% of the symbol can be restored
    #[serde(rename = "L", alias = "l")]
    Low,
    /// About 15% of the symbol can be restored
    #[serde(rename = "M", alias = "m")]
    Medium,
    /// About 25% of the symbol can be restored
    #[serde(rename = "Q", alias = "q")]
    Quartile,
    /// About 30% of the symbol can be restored
    #[serde(rename = "H", alias = "h")]
    High,
}

impl ErrorCorrection {
    /// All levels, lowest redundancy first
    pub const ALL: [ErrorCorrection; 4] = [Self::Low, Self::Medium, Self::Quartile, Self::High];

    /// Single-letter name used in prompts and file formats
    pub fn letter(self) -> char {
        match self {
            Self::Low => 'L',
            Self::Medium => 'M',
            Self::Quartile => 'Q',
            Self::High => 'H',
        }
    }

    /// Approximate share of codewords that can be recovered
    pub fn recovery_percent(self) -> u8 {
        match self {
            Self::Low => 7,
            Self::Medium => 15,
            Self::Quartile => 25,
            Self::High => 30,
        }
    }

    pub(crate) fn to_ec_level(self) -> qrcode::EcLevel {
        match self {
            Self::Low => qrcode::EcLevel::L,
            Self::Medium => qrcode::EcLevel::M,
            Self::Quartile => qrcode::EcLevel::Q,
            Self::High => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for ErrorCorrection {
    type Err = Error;

    /// Case-insensitive single letter, surrounding whitespace ignored.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::Low),
            "M" => Ok(Self::Medium),
            "Q" => Ok(Self::Quartile),
            "H" => Ok(Self::High),
            _ => Err(Error::InvalidErrorCorrection(value.trim().to_string())),
        }
    }
}

/// Everything needed to produce one QR image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    /// Text stored in the symbol
    pub payload: String,
    /// Redundancy tier
    pub level: ErrorCorrection,
    /// Output file name without date suffix or extension
    pub stem: String,
}

impl QrRequest {
    /// Build a request, rejecting an empty payload.
    pub fn new(
        payload: impl Into<String>,
        level: ErrorCorrection,
        stem: impl Into<String>,
    ) -> Result<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(Error::EmptyPayload);
        }
        Ok(Self {
            payload,
            level,
            stem: stem.into(),
        })
    }
}

/// Result of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQr {
    /// Where the PNG was written
    pub path: PathBuf,
    /// Level the symbol was encoded with
    pub level: ErrorCorrection,
    /// Edge length of the image in pixels
    pub size_px: u32,
    /// Length of the payload in bytes
    pub payload_bytes: usize,
}

/// Encode `request` and save it under a fresh name in `dir`, creating `dir` if needed.
pub fn generate(request: &QrRequest, encoder: &QrEncoder, dir: &Path) -> Result<GeneratedQr> {
    let rendered = encoder.encode(request)?;

    std::fs::create_dir_all(dir)?;
    let path = unique_path_today(&request.stem, dir, IMAGE_EXTENSION);
    rendered.save_with_format(&path, image::ImageFormat::Png)?;

    tracing::info!(path = %path.display(), level = %request.level, "Saved QR code");

    Ok(GeneratedQr {
        size_px: rendered.width(),
        path,
        level: request.level,
        payload_bytes: request.payload.len(),
    })
}

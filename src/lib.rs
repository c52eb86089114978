//! qrsheet - QR code images and printable LaTeX contact sheets
//!
//! Two small tools share this library:
//!
//! - `qrsheet-gen` encodes a line of text into a PNG under `qrcodes/`, named
//!   `<stem>_<YYYYMMDD>[_<n>].png` so earlier images are never overwritten.
//! - `qrsheet-doc` collects every PNG in `qrcodes/` into a paginated grid of
//!   captioned figures, writes `latex/qrcode_images.tex`, runs `pdflatex` and
//!   moves the PDF to `pdf/`.
//!
//! # Example
//!
//! ```no_run
//! use qrsheet::{ErrorCorrection, QrEncoder, QrRequest};
//! use std::path::Path;
//!
//! fn main() -> qrsheet::Result<()> {
//!     let request = QrRequest::new("https://example.com", ErrorCorrection::Medium, "site")?;
//!     let generated = qrsheet::qr::generate(&request, &QrEncoder::new(), Path::new("qrcodes"))?;
//!     println!("Saved {}", generated.path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{
    DocumentOptions, LogRotation, LoggingOptions, PathOptions, QrOptions, QrsheetConfig,
};
pub use document::{AssembledDocument, Assembler, LatexCompiler, Layout, LayoutMode};
pub use prompt::Prompter;
pub use qr::{ErrorCorrection, GeneratedQr, QrEncoder, QrRequest};

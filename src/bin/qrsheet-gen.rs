//! Interactive QR code generator

use clap::Parser;
use qrsheet::output::{print_error, render_generated};
use qrsheet::{ErrorCorrection, Prompter, QrEncoder, QrRequest, QrsheetConfig, Result, logging, qr};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrsheet-gen",
    version,
    about = "Encode text into a QR code PNG with a collision-free dated name"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrsheet.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Text to encode (prompted for when omitted)
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Error-correction level L, M, Q or H (prompted for when omitted)
    #[arg(long, value_name = "LEVEL")]
    level: Option<String>,

    /// File name stem, without date suffix or extension (prompted for when omitted)
    #[arg(long, value_name = "STEM")]
    name: Option<String>,

    /// Directory the image is written to (overrides paths.images)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the result as JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = QrsheetConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.paths.images = dir;
    }

    logging::init(&config.logging)?;

    let mut prompter = Prompter::stdio();

    let text = match cli.text {
        Some(text) => text,
        None => prompter.ask("Text to encode: ")?,
    };

    // An invalid level ends the run before anything is written.
    let level = match cli.level {
        Some(level) => level.parse::<ErrorCorrection>()?,
        None => prompter.ask_level(config.qr.default_level)?,
    };

    let stem = match cli.name {
        Some(stem) => stem,
        None => prompter.ask("File name to save (without extension): ")?,
    };

    let request = QrRequest::new(text, level, stem)?;
    info!(level = %request.level, stem = %request.stem, "Generating QR code");

    let encoder = QrEncoder::from_options(&config.qr);
    let generated = qr::generate(&request, &encoder, &config.paths.images)?;

    render_generated(&generated).print(cli.json)
}

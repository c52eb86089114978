//! Assemble a directory of QR images into a PDF via LaTeX

use clap::{Parser, ValueEnum};
use qrsheet::output::{print_error, render_assembled};
use qrsheet::{Assembler, LayoutMode, Prompter, QrsheetConfig, Result, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// Columns adapt to the number of images on the page
    Auto,
    /// Every image is fitted into a fixed box given by --width/--height
    Fixed,
}

#[derive(Parser, Debug)]
#[command(
    name = "qrsheet-doc",
    version,
    about = "Lay out PNG images as a paginated LaTeX document and compile it to PDF"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrsheet.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Image placement (prompted for when omitted)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Fixed image width in cm (implies --layout fixed together with --height)
    #[arg(long, value_name = "CM", requires = "height")]
    width: Option<f64>,

    /// Fixed image height in cm (implies --layout fixed together with --width)
    #[arg(long, value_name = "CM", requires = "width")]
    height: Option<f64>,

    /// Directory scanned for PNG images (overrides paths.images)
    #[arg(long, value_name = "DIR")]
    images: Option<PathBuf>,

    /// Working directory for the LaTeX source (overrides paths.workdir)
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Destination directory of the PDF (overrides paths.pdf)
    #[arg(long, value_name = "DIR")]
    pdf_dir: Option<PathBuf>,

    /// LaTeX compiler binary (overrides document.compiler)
    #[arg(long, value_name = "BIN")]
    compiler: Option<String>,

    /// Delete the working directory after the PDF has been moved
    #[arg(long)]
    remove_workdir: bool,

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
    if let Some(dir) = cli.images {
        config.paths.images = dir;
    }
    if let Some(dir) = cli.workdir {
        config.paths.workdir = dir;
    }
    if let Some(dir) = cli.pdf_dir {
        config.paths.pdf = dir;
    }
    if let Some(compiler) = cli.compiler {
        config.document.compiler = compiler;
    }
    if cli.remove_workdir {
        config.document.remove_workdir = true;
    }

    logging::init(&config.logging)?;

    let mut prompter = Prompter::stdio();
    let mode = match (cli.layout, cli.width, cli.height) {
        (Some(LayoutArg::Auto), _, _) => LayoutMode::Auto,
        (_, Some(width_cm), Some(height_cm)) => LayoutMode::Fixed {
            width_cm,
            height_cm,
        },
        (Some(LayoutArg::Fixed), _, _) => prompter.ask_dimensions()?,
        (None, _, _) => prompter.choose_layout()?,
    };
    info!(?mode, "Selected layout");

    let assembler = Assembler::new(config.paths, config.document, mode)?;
    let document = assembler.run()?;

    render_assembled(&document).print(cli.json)
}

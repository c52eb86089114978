//! Helpers for rendering run summaries

use crate::document::AssembledDocument;
use crate::error::Error;
use crate::qr::GeneratedQr;
use serde_json::{Value, json};

/// Combined structured and human-readable representation of a run
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Structured JSON representation for scripting
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

impl Rendered {
    /// Print either the JSON document or the human lines to stdout.
    pub fn print(&self, as_json: bool) -> crate::Result<()> {
        if as_json {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else {
            for line in &self.human {
                println!("{line}");
            }
        }
        Ok(())
    }
}

/// Print a fatal error to stderr, echoing the compiler's own diagnostics if any.
pub fn print_error(err: &Error) {
    eprintln!("{err}");
    if let Error::CompileFailed { stderr, .. } = err {
        eprintln!("----- STDERR -----");
        eprintln!("{stderr}");
    }
}

/// Render the summary of a generated QR image.
pub fn render_generated(generated: &GeneratedQr) -> Rendered {
    let json = json!({
        "path": generated.path.display().to_string(),
        "level": generated.level.to_string(),
        "size_px": generated.size_px,
        "payload_bytes": generated.payload_bytes,
    });
    let human = vec![format!(
        "Saved QR code to '{}' (level {}, {}x{} px)",
        generated.path.display(),
        generated.level,
        generated.size_px,
        generated.size_px
    )];
    Rendered { json, human }
}

/// Render the summary of an assembled document.
pub fn render_assembled(document: &AssembledDocument) -> Rendered {
    let json = json!({
        "tex_path": document.tex_path.display().to_string(),
        "pdf_path": document.pdf_path.display().to_string(),
        "images": document.image_count,
        "pages": document.pages,
        "cleared_workdir": document.cleared_workdir,
    });

    let mut human = Vec::new();
    if document.cleared_workdir {
        human.push("Removed previous working directory".to_string());
    }
    human.push(format!(
        "Saved LaTeX source to '{}'",
        document.tex_path.display()
    ));
    human.push(format!(
        "Placed {} image(s) on {} page(s)",
        document.image_count, document.pages
    ));
    human.push(format!("Moved PDF to '{}'", document.pdf_path.display()));

    Rendered { json, human }
}

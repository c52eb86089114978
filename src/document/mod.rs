//! LaTeX document assembly
//!
//! Collects the PNG images of one directory, lays them out as a paginated grid
//! of captioned sub-figures, and compiles the result to PDF with an external
//! LaTeX compiler.
//!
//! The run is strictly sequential:
//!
//! 1. clear the previous working directory
//! 2. scan and copy the images
//! 3. write the `.tex` source
//! 4. compile, remove intermediates, move the PDF

mod compiler;
mod escape;
mod layout;

pub use compiler::{LatexCompiler, NON_INTERACTIVE_FLAG, move_file, remove_intermediates};
pub use escape::escape_caption;
pub use layout::{Layout, LayoutMode, Page, paginate, render_document};

use crate::config::{DocumentOptions, PathOptions};
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// List the PNG files (case-insensitive extension) directly inside `dir`, sorted by name.
pub fn scan_images(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::ImageDirMissing(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if name.to_ascii_lowercase().ends_with(".png") {
            images.push(name);
        }
    }

    if images.is_empty() {
        return Err(Error::NoImages(dir.to_path_buf()));
    }

    images.sort();
    Ok(images)
}

/// Fill `{date}` in `template` with `date` rendered through `date_format`.
pub fn render_title(template: &str, date_format: &str, date: NaiveDate) -> Result<String> {
    let mut formatted = String::new();
    write!(formatted, "{}", date.format(date_format))
        .map_err(|_| Error::Config(format!("Invalid date format '{date_format}'")))?;
    Ok(template.replace("{date}", &formatted))
}

// Compares resolved paths where they exist so `./latex` and `latex` match.
fn contains(outer: &Path, inner: &Path) -> bool {
    let outer = fs::canonicalize(outer).unwrap_or_else(|_| outer.to_path_buf());
    let inner = fs::canonicalize(inner).unwrap_or_else(|_| inner.to_path_buf());
    inner.starts_with(&outer)
}

/// Source written to disk, ready for compilation
#[derive(Debug, Clone, Serialize)]
pub struct PreparedDocument {
    /// Path of the `.tex` file
    pub tex_path: PathBuf,
    /// Images placed in the document, in order
    pub images: Vec<String>,
    /// Number of figure pages
    pub pages: usize,
}

/// Outcome of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct AssembledDocument {
    /// Path of the `.tex` file
    pub tex_path: PathBuf,
    /// Final location of the PDF
    pub pdf_path: PathBuf,
    /// Number of images placed
    pub image_count: usize,
    /// Number of figure pages
    pub pages: usize,
    /// Whether the working directory existed and was cleared first
    pub cleared_workdir: bool,
}

/// Drives one document run over the configured directories
#[derive(Debug, Clone)]
pub struct Assembler {
    paths: PathOptions,
    options: DocumentOptions,
    layout: Layout,
}

impl Assembler {
    /// Assembler for `paths`, laying images out with `mode`.
    ///
    /// The working directory is wiped on every run, so it must not hold the
    /// source images.
    pub fn new(paths: PathOptions, options: DocumentOptions, mode: LayoutMode) -> Result<Self> {
        options.validate()?;
        if contains(&paths.workdir, &paths.images) {
            return Err(Error::Config(format!(
                "Working directory '{}' must not contain the image directory '{}'",
                paths.workdir.display(),
                paths.images.display()
            )));
        }
        let layout = Layout {
            mode,
            images_per_page: options.images_per_page,
            max_columns: options.max_columns,
            row_spacing: options.row_spacing.clone(),
        };
        Ok(Self {
            paths,
            options,
            layout,
        })
    }

    /// Remove a leftover working directory. Returns whether one existed.
    pub fn clear_workdir(&self) -> Result<bool> {
        let workdir = &self.paths.workdir;
        if !workdir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(workdir)?;
        tracing::info!(workdir = %workdir.display(), "Removed previous working directory");
        Ok(true)
    }

    /// Scan, copy and write the LaTeX source dated `date`.
    pub fn prepare(&self, date: NaiveDate) -> Result<PreparedDocument> {
        let images = scan_images(&self.paths.images)?;
        tracing::info!(count = images.len(), dir = %self.paths.images.display(), "Found images");

        fs::create_dir_all(&self.paths.workdir)?;
        for name in &images {
            fs::copy(self.paths.images.join(name), self.paths.workdir.join(name))?;
        }

        let title = render_title(&self.options.title, &self.options.date_format, date)?;
        let lines = render_document(&images, &title, &self.layout);
        let pages = paginate(&images, &self.layout).len();

        let tex_path = self.paths.workdir.join(&self.options.tex_filename);
        fs::write(&tex_path, lines.join("\n"))?;
        tracing::info!(path = %tex_path.display(), pages, "Wrote LaTeX source");

        Ok(PreparedDocument {
            tex_path,
            images,
            pages,
        })
    }

    /// Compile a prepared source, tidy the working directory and move the PDF.
    ///
    /// Returns the final PDF path.
    pub fn finish(&self, prepared: &PreparedDocument, compiler: &LatexCompiler) -> Result<PathBuf> {
        let workdir = &self.paths.workdir;
        compiler.compile(workdir, &self.options.tex_filename)?;
        tracing::info!(tex = %prepared.tex_path.display(), "Compilation succeeded");

        remove_intermediates(
            workdir,
            self.options.stem(),
            &self.options.intermediate_extensions,
        )?;

        fs::create_dir_all(&self.paths.pdf)?;
        let src = workdir.join(&self.options.pdf_filename);
        let dst = self.paths.pdf.join(&self.options.pdf_filename);
        move_file(&src, &dst)?;
        tracing::info!(pdf = %dst.display(), "Moved PDF");

        if self.options.remove_workdir {
            fs::remove_dir_all(workdir)?;
            tracing::info!(workdir = %workdir.display(), "Removed working directory");
        }

        Ok(dst)
    }

    /// Full run dated today, locating the configured compiler after the source is written.
    pub fn run(&self) -> Result<AssembledDocument> {
        let cleared_workdir = self.clear_workdir()?;
        let prepared = self.prepare(Local::now().date_naive())?;
        let compiler = LatexCompiler::locate(&self.options.compiler)?;
        let pdf_path = self.finish(&prepared, &compiler)?;

        Ok(AssembledDocument {
            tex_path: prepared.tex_path,
            pdf_path,
            image_count: prepared.images.len(),
            pages: prepared.pages,
            cleared_workdir,
        })
    }
}

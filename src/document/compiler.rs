//! External LaTeX compiler invocation

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Flag keeping the compiler from waiting on the terminal after an error
pub const NON_INTERACTIVE_FLAG: &str = "-interaction=nonstopmode";

/// A LaTeX compiler located on the system
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    name: String,
    program: PathBuf,
}

impl LatexCompiler {
    /// Resolve `name` on `PATH` (or as a path), failing with
    /// [`Error::CompilerNotFound`] when it cannot be run.
    pub fn locate(name: &str) -> Result<Self> {
        let program =
            which::which(name).map_err(|_| Error::CompilerNotFound(name.to_string()))?;
        tracing::debug!(compiler = %program.display(), "Resolved LaTeX compiler");
        Ok(Self {
            name: name.to_string(),
            program,
        })
    }

    /// Compile `tex_filename` inside `workdir`, blocking until the compiler exits.
    ///
    /// There is no timeout: a compiler that never exits hangs the caller.
    pub fn compile(&self, workdir: &Path, tex_filename: &str) -> Result<()> {
        tracing::info!(
            compiler = %self.name,
            workdir = %workdir.display(),
            tex = tex_filename,
            "Running LaTeX compiler"
        );

        let output = Command::new(&self.program)
            .arg(NON_INTERACTIVE_FLAG)
            .arg(tex_filename)
            .current_dir(workdir)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::CompilerNotFound(self.name.clone()),
                _ => Error::Io(e),
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            tracing::debug!(stdout = %stdout, "Compiler output");
            return Err(Error::CompileFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

/// Remove `<stem><ext>` from `dir` for every listed extension that exists.
///
/// Returns the files that were deleted.
pub fn remove_intermediates(dir: &Path, stem: &str, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for ext in extensions {
        let path = dir.join(format!("{stem}.{}", ext.trim_start_matches('.')));
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed intermediate file");
                removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}

/// Move `src` to `dst`, falling back to copy and delete across filesystems.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    std::fs::copy(src, dst)?;
    std::fs::remove_file(src)?;
    Ok(())
}

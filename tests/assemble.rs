use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::NaiveDate;
use qrsheet::{Assembler, DocumentOptions, Error, LatexCompiler, LayoutMode, PathOptions};

fn paths_in(root: &Path) -> PathOptions {
    PathOptions {
        images: root.join("qrcodes"),
        workdir: root.join("latex"),
        pdf: root.join("pdf"),
    }
}

fn seed_images(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"png").unwrap();
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

#[cfg(unix)]
fn fake_compiler(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-latex");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn three_images_form_one_page() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    seed_images(&paths.images, &["c.png", "a.png", "b.png"]);

    let assembler = Assembler::new(paths.clone(), DocumentOptions::default(), LayoutMode::Auto).unwrap();
    let prepared = assembler.prepare(date()).unwrap();

    assert_eq!(prepared.images, vec!["a.png", "b.png", "c.png"]);
    assert_eq!(prepared.pages, 1);
    for name in ["a.png", "b.png", "c.png"] {
        assert!(paths.workdir.join(name).exists(), "{name} not copied");
    }

    let source = fs::read_to_string(paths.workdir.join("qrcode_images.tex")).unwrap();
    assert_eq!(source.matches(r"\begin{figure}").count(), 1);
    assert_eq!(source.matches(r"{0.33\textwidth}").count(), 3);
    assert_eq!(source.matches(r"\vspace").count(), 1);
    assert!(source.contains(r"\title{QRコード一覧（2024年03月09日）}"));
    assert!(source.ends_with(r"\end{document}"));
}

#[test]
fn page_count_follows_capacity() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    let names: Vec<String> = (0..25).map(|i| format!("code_{i:02}.png")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    seed_images(&paths.images, &refs);

    let assembler = Assembler::new(paths.clone(), DocumentOptions::default(), LayoutMode::Auto).unwrap();
    let prepared = assembler.prepare(date()).unwrap();
    assert_eq!(prepared.pages, 3);

    let source = fs::read_to_string(&prepared.tex_path).unwrap();
    assert_eq!(source.matches(r"\clearpage").count(), 3);
    // last page holds the single leftover image at full width
    assert_eq!(source.matches(r"{1.00\textwidth}").count(), 1);
    assert!(source.contains(r"\caption{code24.png}"));
    assert!(!source.contains(r"\caption{code_24.png}"));
}

#[test]
fn missing_and_empty_image_dirs() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    let assembler = Assembler::new(paths.clone(), DocumentOptions::default(), LayoutMode::Auto).unwrap();

    assert!(matches!(assembler.prepare(date()), Err(Error::ImageDirMissing(_))));

    seed_images(&paths.images, &["notes.txt"]);
    assert!(matches!(assembler.prepare(date()), Err(Error::NoImages(_))));
}

#[test]
fn stale_workdir_is_cleared() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    seed_images(&paths.images, &["a.png"]);
    seed_images(&paths.workdir, &["stale.png"]);

    let assembler = Assembler::new(paths.clone(), DocumentOptions::default(), LayoutMode::Auto).unwrap();
    assert!(assembler.clear_workdir().unwrap());
    assert!(!assembler.clear_workdir().unwrap());

    assembler.prepare(date()).unwrap();
    assert!(!paths.workdir.join("stale.png").exists());
    assert!(paths.workdir.join("a.png").exists());
}

#[test]
fn missing_compiler_is_reported() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    seed_images(&paths.images, &["a.png"]);

    let options = DocumentOptions {
        compiler: "qrsheet-missing-pdflatex".to_string(),
        ..DocumentOptions::default()
    };
    let assembler = Assembler::new(paths.clone(), options, LayoutMode::Auto).unwrap();

    let err = assembler.run().unwrap_err();
    assert!(matches!(err, Error::CompilerNotFound(ref name) if name == "qrsheet-missing-pdflatex"));
    assert!(err.to_string().contains("not found"));
    // the source is still written for manual compilation
    assert!(paths.workdir.join("qrcode_images.tex").exists());
    assert!(!paths.pdf.exists());
}

#[cfg(unix)]
#[test]
fn successful_compile_moves_pdf_and_cleans_up() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    seed_images(&paths.images, &["a.png", "b.png"]);

    // writes the artifacts pdflatex would leave next to the source
    let compiler = fake_compiler(
        root.path(),
        r#"[ "$1" = "-interaction=nonstopmode" ] || exit 3
stem=$(basename "$2" .tex)
echo pdf > "$stem.pdf"
echo aux > "$stem.aux"
echo log > "$stem.log""#,
    );
    let options = DocumentOptions {
        compiler: compiler.display().to_string(),
        ..DocumentOptions::default()
    };
    let assembler = Assembler::new(
        paths.clone(),
        options,
        LayoutMode::Fixed {
            width_cm: 4.0,
            height_cm: 4.0,
        },
    )
    .unwrap();

    let document = assembler.run().unwrap();

    assert_eq!(document.pdf_path, paths.pdf.join("qrcode_images.pdf"));
    assert_eq!(document.image_count, 2);
    assert_eq!(document.pages, 1);
    assert!(!document.cleared_workdir);
    assert!(document.pdf_path.exists());
    assert!(!paths.workdir.join("qrcode_images.pdf").exists());
    assert!(!paths.workdir.join("qrcode_images.aux").exists());
    assert!(!paths.workdir.join("qrcode_images.log").exists());
    assert!(paths.workdir.join("qrcode_images.tex").exists());

    let source = fs::read_to_string(&document.tex_path).unwrap();
    assert!(source.contains(r"\includegraphics[width=4cm,height=4cm,keepaspectratio]{a.png}"));
}

#[cfg(unix)]
#[test]
fn failed_compile_surfaces_stderr() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    seed_images(&paths.images, &["a.png"]);

    let compiler = fake_compiler(root.path(), "echo 'Undefined control sequence' >&2\nexit 1");
    let located = LatexCompiler::locate(&compiler.display().to_string()).unwrap();

    let assembler = Assembler::new(paths.clone(), DocumentOptions::default(), LayoutMode::Auto).unwrap();
    let prepared = assembler.prepare(date()).unwrap();

    match assembler.finish(&prepared, &located) {
        Err(Error::CompileFailed { status, stderr }) => {
            assert_eq!(status.code(), Some(1));
            assert!(stderr.contains("Undefined control sequence"), "{stderr}");
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
    assert!(!paths.pdf.exists());
}

#[cfg(unix)]
#[test]
fn remove_workdir_after_success() {
    let root = tempfile::tempdir().unwrap();
    let paths = paths_in(root.path());
    seed_images(&paths.images, &["a.png"]);

    let compiler = fake_compiler(root.path(), r#"echo pdf > "$(basename "$2" .tex).pdf""#);
    let options = DocumentOptions {
        compiler: compiler.display().to_string(),
        remove_workdir: true,
        ..DocumentOptions::default()
    };
    let assembler = Assembler::new(paths.clone(), options, LayoutMode::Auto).unwrap();

    let document = assembler.run().unwrap();
    assert!(document.pdf_path.exists());
    assert!(!paths.workdir.exists());
}

fn run_doc(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_qrsheet-doc"))
        .args(args)
        .current_dir(dir)
        .env_remove("XDG_CONFIG_HOME")
        .stdin(Stdio::null())
        .output()
        .expect("run qrsheet-doc")
}

#[test]
fn dimension_flags_select_fixed_layout_without_menu() {
    let root = tempfile::tempdir().unwrap();

    let output = run_doc(root.path(), &["--width", "3", "--height", "4"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    // no menu is shown; the run gets as far as the missing image directory
    assert!(!stdout.contains("Choose how images are placed"), "{stdout}");
    assert!(stderr.contains("Image directory 'qrcodes' not found"), "{stderr}");
}

#[test]
fn width_without_height_is_rejected() {
    let root = tempfile::tempdir().unwrap();

    let output = run_doc(root.path(), &["--width", "3"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--height"), "{stderr}");
}

#[test]
fn workdir_holding_images_is_refused() {
    let root = tempfile::tempdir().unwrap();
    seed_images(&root.path().join("qrcodes"), &["a.png"]);

    let output = run_doc(root.path(), &["--layout", "auto", "--workdir", "qrcodes"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must not contain the image directory"), "{stderr}");
    assert!(root.path().join("qrcodes").join("a.png").exists());
}

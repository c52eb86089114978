//! Page partitioning and LaTeX source generation

use super::escape::escape_caption;
use serde::Serialize;

/// How each image is sized inside its grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LayoutMode {
    /// Image fills its column
    Auto,
    /// Image is scaled to fit a fixed box, aspect ratio kept
    Fixed {
        /// Box width in centimetres
        width_cm: f64,
        /// Box height in centimetres
        height_cm: f64,
    },
}

/// Grid parameters for one document
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Image sizing mode
    pub mode: LayoutMode,
    /// Maximum images per page (at least 1)
    pub images_per_page: usize,
    /// Maximum images per row (at least 1)
    pub max_columns: usize,
    /// Vertical gap emitted after each full row
    pub row_spacing: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Auto,
            images_per_page: 12,
            max_columns: 4,
            row_spacing: "0.5cm".to_string(),
        }
    }
}

/// One page worth of images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    /// Images on this page, in document order
    pub images: &'a [String],
    /// Images per row on this page
    pub columns: usize,
}

impl Page<'_> {
    /// Share of `\textwidth` given to each image.
    pub fn width_fraction(&self) -> f64 {
        1.0 / self.columns as f64
    }
}

/// Split `images` into pages of at most `layout.images_per_page`.
///
/// Column count adapts to short pages: a page of two images gets two
/// half-width columns.
pub fn paginate<'a>(images: &'a [String], layout: &Layout) -> Vec<Page<'a>> {
    let per_page = layout.images_per_page.max(1);
    let max_columns = layout.max_columns.max(1);

    images
        .chunks(per_page)
        .map(|batch| Page {
            images: batch,
            columns: batch.len().min(max_columns),
        })
        .collect()
}

const PREAMBLE: &[&str] = &[
    r"\documentclass{article}",
    r"\usepackage{graphicx}",
    r"\usepackage{subcaption}",
    r"\usepackage[a4paper, margin=1in]{geometry}",
    r"\usepackage{titlesec}",
    r"\usepackage{caption}",
    r"\captionsetup[subfigure]{labelformat=empty}",
];

/// Build the full LaTeX source as a list of lines.
///
/// Every page, the last one included, is closed with `\clearpage`.
pub fn render_document(images: &[String], title: &str, layout: &Layout) -> Vec<String> {
    let mut lines: Vec<String> = PREAMBLE.iter().map(|line| line.to_string()).collect();
    lines.push(format!(r"\title{{{}}}", escape_caption(title)));
    lines.push(r"\date{}".to_string());
    lines.push(r"\begin{document}".to_string());
    lines.push(r"\maketitle".to_string());

    for page in paginate(images, layout) {
        render_page(&mut lines, &page, layout);
    }

    lines.push(r"\end{document}".to_string());
    lines
}

fn render_page(lines: &mut Vec<String>, page: &Page<'_>, layout: &Layout) {
    let width = page.width_fraction();

    lines.push(r"\begin{figure}[htbp]".to_string());
    lines.push(r"\centering".to_string());

    for (i, filename) in page.images.iter().enumerate() {
        lines.push(format!(r"  \begin{{subfigure}}[b]{{{width:.2}\textwidth}}"));
        lines.push(r"    \centering".to_string());
        lines.push(match layout.mode {
            LayoutMode::Auto => format!(r"    \includegraphics[width=\textwidth]{{{filename}}}"),
            LayoutMode::Fixed {
                width_cm,
                height_cm,
            } => format!(
                r"    \includegraphics[width={width_cm}cm,height={height_cm}cm,keepaspectratio]{{{filename}}}"
            ),
        });
        lines.push(format!(r"    \caption{{{}}}", escape_caption(filename)));
        lines.push(r"  \end{subfigure}".to_string());

        if (i + 1) % page.columns == 0 {
            lines.push(format!(r"  \vspace{{{}}}\par", layout.row_spacing));
        }
    }

    lines.push(r"\end{figure}".to_string());
    lines.push(r"\clearpage".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("img{i:03}.png")).collect()
    }

    fn count(lines: &[String], needle: &str) -> usize {
        lines.iter().filter(|line| line.contains(needle)).count()
    }

    #[test]
    fn test_page_count_is_ceiling() {
        let layout = Layout::default();
        for (n, expected) in [(1, 1), (11, 1), (12, 1), (13, 2), (24, 2), (25, 3)] {
            let images = names(n);
            assert_eq!(paginate(&images, &layout).len(), expected, "n = {n}");
            let lines = render_document(&images, "t", &layout);
            assert_eq!(count(&lines, r"\begin{figure}"), expected, "n = {n}");
        }
        assert!(paginate(&[], &layout).is_empty());
    }

    #[test]
    fn test_columns_capped_by_page_and_max() {
        let layout = Layout::default();
        let images = names(14);
        let pages = paginate(&images, &layout);
        assert_eq!(pages[0].images.len(), 12);
        assert_eq!(pages[0].columns, 4);
        assert_eq!(pages[1].images.len(), 2);
        assert_eq!(pages[1].columns, 2);
        assert_eq!(pages[1].width_fraction(), 0.5);
    }

    #[test]
    fn test_three_images_single_row() {
        let images: Vec<String> = ["a.png", "b.png", "c.png"].map(String::from).to_vec();
        let lines = render_document(&images, "t", &Layout::default());

        assert_eq!(count(&lines, r"\begin{figure}"), 1);
        assert_eq!(count(&lines, r"{0.33\textwidth}"), 3);

        // the only row break follows the last image
        let breaks: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains(r"\vspace"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(breaks.len(), 1);
        let last_subfigure = lines
            .iter()
            .rposition(|line| line.contains(r"\end{subfigure}"))
            .unwrap();
        assert_eq!(breaks[0], last_subfigure + 1);
    }

    #[test]
    fn test_row_breaks_after_each_full_row() {
        let images = names(12);
        let lines = render_document(&images, "t", &Layout::default());
        assert_eq!(count(&lines, r"\vspace{0.5cm}\par"), 3);

        let images = names(6);
        let layout = Layout {
            max_columns: 4,
            images_per_page: 6,
            ..Layout::default()
        };
        let lines = render_document(&images, "t", &layout);
        // one full row of four, the remaining two never complete a row
        assert_eq!(count(&lines, r"\vspace"), 1);
        assert_eq!(count(&lines, r"{0.25\textwidth}"), 6);
    }

    #[test]
    fn test_every_page_ends_with_clearpage() {
        let images = names(13);
        let lines = render_document(&images, "t", &Layout::default());
        assert_eq!(count(&lines, r"\clearpage"), 2);
        assert_eq!(lines[lines.len() - 2], r"\clearpage");
        assert_eq!(lines[lines.len() - 1], r"\end{document}");
    }

    #[test]
    fn test_fixed_mode_uses_physical_size() {
        let images = vec!["seat_1.png".to_string()];
        let layout = Layout {
            mode: LayoutMode::Fixed {
                width_cm: 3.5,
                height_cm: 4.0,
            },
            ..Layout::default()
        };
        let lines = render_document(&images, "t", &layout);
        assert!(lines.contains(
            &r"    \includegraphics[width=3.5cm,height=4cm,keepaspectratio]{seat_1.png}".to_string()
        ));
        assert!(lines.contains(&r"    \caption{seat1.png}".to_string()));
        assert!(lines.contains(&r"  \begin{subfigure}[b]{1.00\textwidth}".to_string()));
    }

    #[test]
    fn test_preamble_and_title() {
        let lines = render_document(&names(1), "QR codes (2024_03_09)", &Layout::default());
        assert_eq!(lines[0], r"\documentclass{article}");
        assert!(lines.contains(&r"\captionsetup[subfigure]{labelformat=empty}".to_string()));
        assert!(lines.contains(&r"\title{QR codes (20240309)}".to_string()));
        assert!(lines.contains(&r"\maketitle".to_string()));
        assert!(lines.contains(&r"    \includegraphics[width=\textwidth]{img000.png}".to_string()));
    }
}

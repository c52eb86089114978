//! Caption escaping for LaTeX

/// Make `text` safe to use inside `\caption{}`.
///
/// `_` and `%` are dropped, the remaining special characters are escaped. A
/// literal backslash is dropped as well rather than spelled out as
/// `\textbackslash{}`, which older TeX distributions choked on inside captions.
///
/// Replacements are emitted in a single pass, so the backslashes they introduce
/// are never stripped again.
pub fn escape_caption(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '_' | '%' | '\\' => {}
            '&' => escaped.push_str(r"\&"),
            '$' => escaped.push_str(r"\$"),
            '#' => escaped.push_str(r"\#"),
            '{' => escaped.push_str(r"\{"),
            '}' => escaped.push_str(r"\}"),
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            other => escaped.push(other),
        }
    }
    escaped
}

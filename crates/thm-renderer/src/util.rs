//! Escaping and small rendering helpers.

use pulldown_cmark::{Options, Parser, html};

/// Escape text for HTML output.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for LaTeX output.
///
/// Covers the characters LaTeX treats specially in ordinary text;
/// backslash becomes `\textbackslash{}`.
#[must_use]
pub(crate) fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one-line markdown (a statement title) to inline HTML.
///
/// Titles may carry inline markup, so they go through the markdown
/// pipeline rather than being escaped away; the wrapping `<p>` from the
/// block-level parse is stripped.
#[must_use]
pub(crate) fn render_inline_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
    let mut rendered = String::with_capacity(text.len() + 16);
    html::push_html(&mut rendered, parser);

    let rendered = rendered.trim_end();
    rendered
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map_or_else(|| rendered.to_owned(), str::to_owned)
}

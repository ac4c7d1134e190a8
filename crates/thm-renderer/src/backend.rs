//! Output-format backend trait.

use thm_model::Statement;
use thm_registry::Entry;

/// Everything a backend needs to render one reference site.
///
/// Resolution happens in the renderer; the backend only formats the
/// outcome. `entry: None` means the reference is dangling and renders
/// as inert text.
#[derive(Debug)]
pub struct RefContext<'a> {
    /// Referenced label, as written in the source.
    pub label: &'a str,
    /// Resolved registry entry, if the label is known.
    pub entry: Option<&'a Entry>,
    /// Explicit override title from the reference site.
    pub override_title: Option<&'a str>,
    /// Document containing the reference (cross-document links are
    /// relative to it).
    pub current_doc: &'a str,
}

/// Format-specific rendering of statements and references.
///
/// Backends are pure formatting: numbering and resolution are already
/// done when a backend method runs. Implementations exist for HTML
/// ([`HtmlBackend`](crate::HtmlBackend)) and LaTeX
/// ([`LatexBackend`](crate::LatexBackend)); a new output format is one
/// new impl, with no change to the node model or the registry.
pub trait StatementBackend: Send + Sync {
    /// File extension for rendered documents (without dot).
    const EXTENSION: &'static str;

    /// Emit the opening markup for a statement (wrapper plus title line
    /// for HTML, `\begin{...}` for LaTeX).
    fn statement_start(&self, statement: &Statement, out: &mut String);

    /// Emit the closing markup for a statement.
    fn statement_end(&self, statement: &Statement, out: &mut String);

    /// Emit one reference site.
    fn reference(&self, reference: &RefContext<'_>, out: &mut String);

    /// Emit once-per-build setup (LaTeX `\newtheorem` declarations).
    ///
    /// Formats that compute numbers literally have nothing to declare.
    fn preamble(&self, out: &mut String) {
        let _ = out;
    }

    /// Finish a preprocessed document (HTML: markdown conversion of the
    /// interleaved content; LaTeX: passthrough).
    #[must_use]
    fn finish(&self, preprocessed: String) -> String {
        preprocessed
    }
}

//! HTML statement backend.
//!
//! Statements render as styleable `<div>` blocks with a literal,
//! precomputed number in the title line:
//!
//! ```html
//! <div class="statement statement-type-theorem" id="pigeonhole">
//! <div class="statement-title"><span class="statement-title-name">Theorem 1</span>
//! <span class="statement-title-detail">(Pigeonhole)</span></div>
//!
//! body…
//!
//! </div>
//! ```
//!
//! The wrapper passes through pulldown-cmark as a raw HTML block, so
//! the body between the blank lines is still parsed as markdown.

use std::fmt::Write;

use pulldown_cmark::{Options, Parser, html};
use thm_model::{KindTable, Statement, StatementKind};

use crate::backend::{RefContext, StatementBackend};
use crate::util::{escape_html, render_inline_markdown};

/// HTML render backend.
pub struct HtmlBackend {
    kinds: KindTable,
    title_template: String,
    reference_format: String,
}

impl HtmlBackend {
    /// Create a backend with the default `{name} {number}` formats.
    #[must_use]
    pub fn new(kinds: KindTable) -> Self {
        Self {
            kinds,
            title_template: "{name} {number}".to_owned(),
            reference_format: "{name} {number}".to_owned(),
        }
    }

    /// Set the statement title-line template.
    ///
    /// Placeholders: `{name}` (human kind name), `{number}`.
    #[must_use]
    pub fn with_title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = template.into();
        self
    }

    /// Set the cross-reference text format.
    ///
    /// Placeholders: `{name}`, `{number}`.
    #[must_use]
    pub fn with_reference_format(mut self, format: impl Into<String>) -> Self {
        self.reference_format = format.into();
        self
    }

    /// Format a kind/number pair with a template.
    ///
    /// Kinds missing from the configured map fall back to a bare
    /// `(number)`; unnumbered statements use the name alone.
    fn format_heading(&self, template: &str, kind: StatementKind, number: Option<u64>) -> String {
        match (self.kinds.human_name(kind), number) {
            (Some(name), Some(number)) => template
                .replace("{name}", name)
                .replace("{number}", &number.to_string()),
            (Some(name), None) => name.to_owned(),
            (None, Some(number)) => format!("({number})"),
            (None, None) => String::new(),
        }
    }
}

impl StatementBackend for HtmlBackend {
    const EXTENSION: &'static str = "html";

    fn statement_start(&self, statement: &Statement, out: &mut String) {
        out.push_str("<div class=\"statement statement-type-");
        out.push_str(statement.kind.as_str());
        out.push('"');
        if let Some(label) = &statement.label {
            write!(out, " id=\"{}\"", escape_html(label)).unwrap();
        }
        out.push_str(">\n");

        let heading = self.format_heading(&self.title_template, statement.kind, statement.number);
        out.push_str("<div class=\"statement-title\">");
        if !heading.is_empty() {
            write!(
                out,
                "<span class=\"statement-title-name\">{}</span>",
                escape_html(&heading)
            )
            .unwrap();
        }
        if let Some(title) = &statement.title {
            if !heading.is_empty() {
                out.push(' ');
            }
            write!(
                out,
                "<span class=\"statement-title-detail\">({})</span>",
                render_inline_markdown(title)
            )
            .unwrap();
        }
        out.push_str("</div>");
    }

    fn statement_end(&self, _statement: &Statement, out: &mut String) {
        out.push_str("</div>");
    }

    fn reference(&self, reference: &RefContext<'_>, out: &mut String) {
        let Some(entry) = reference.entry else {
            // Dangling: inert text, warning raised by the renderer.
            out.push_str(&escape_html(reference.label));
            return;
        };

        let href = if entry.doc == reference.current_doc {
            format!("#{}", reference.label)
        } else {
            format!("{}.html#{}", entry.doc, reference.label)
        };

        let text = if let Some(title) = reference.override_title {
            title.to_owned()
        } else if entry.number.is_some() {
            self.format_heading(&self.reference_format, entry.kind, entry.number)
        } else {
            // Unnumbered statements are referenced by title.
            entry
                .title
                .clone()
                .unwrap_or_else(|| reference.label.to_owned())
        };

        write!(
            out,
            "<a href=\"{}\" class=\"statement-ref\">{}</a>",
            escape_html(&href),
            escape_html(&text)
        )
        .unwrap();
    }

    fn finish(&self, preprocessed: String) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(&preprocessed, options);
        let mut rendered = String::with_capacity(preprocessed.len() * 2);
        html::push_html(&mut rendered, parser);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use thm_registry::Entry;

    fn backend() -> HtmlBackend {
        HtmlBackend::new(KindTable::new())
    }

    fn theorem(number: Option<u64>) -> Statement {
        Statement {
            kind: StatementKind::Theorem,
            title: Some("Pigeonhole".to_owned()),
            label: Some("pigeonhole".to_owned()),
            explicit_label: true,
            body: vec![],
            doc: "intro".to_owned(),
            line: 1,
            number,
        }
    }

    #[test]
    fn test_statement_start() {
        let mut out = String::new();
        backend().statement_start(&theorem(Some(1)), &mut out);

        assert!(out.contains(r#"class="statement statement-type-theorem""#));
        assert!(out.contains(r#"id="pigeonhole""#));
        assert!(out.contains(r#"<span class="statement-title-name">Theorem 1</span>"#));
        assert!(out.contains(r#"<span class="statement-title-detail">(Pigeonhole)</span>"#));
    }

    #[test]
    fn test_statement_start_unnumbered() {
        let mut out = String::new();
        let statement = Statement {
            kind: StatementKind::Proof,
            title: None,
            label: None,
            explicit_label: false,
            body: vec![],
            doc: "intro".to_owned(),
            line: 3,
            number: None,
        };
        backend().statement_start(&statement, &mut out);

        assert!(out.contains(r#"<span class="statement-title-name">Proof</span>"#));
        assert!(!out.contains("id="));
    }

    #[test]
    fn test_statement_title_inline_markup() {
        let mut out = String::new();
        let mut statement = theorem(Some(2));
        statement.title = Some("Euler's *identity*".to_owned());
        backend().statement_start(&statement, &mut out);

        assert!(out.contains("(Euler's <em>identity</em>)"));
    }

    #[test]
    fn test_statement_end() {
        let mut out = String::new();
        backend().statement_end(&theorem(Some(1)), &mut out);
        assert_eq!(out, "</div>");
    }

    #[test]
    fn test_reference_same_doc() {
        let entry = Entry {
            doc: "intro".to_owned(),
            number: Some(3),
            kind: StatementKind::Theorem,
            title: None,
        };
        let mut out = String::new();
        backend().reference(
            &RefContext {
                label: "pigeonhole",
                entry: Some(&entry),
                override_title: None,
                current_doc: "intro",
            },
            &mut out,
        );
        assert_eq!(
            out,
            r##"<a href="#pigeonhole" class="statement-ref">Theorem 3</a>"##
        );
    }

    #[test]
    fn test_reference_cross_doc() {
        let entry = Entry {
            doc: "advanced".to_owned(),
            number: Some(7),
            kind: StatementKind::Lemma,
            title: None,
        };
        let mut out = String::new();
        backend().reference(
            &RefContext {
                label: "zorn",
                entry: Some(&entry),
                override_title: None,
                current_doc: "intro",
            },
            &mut out,
        );
        assert!(out.contains(r#"href="advanced.html#zorn""#));
        assert!(out.contains("Lemma 7"));
    }

    #[test]
    fn test_reference_override_title() {
        let entry = Entry {
            doc: "intro".to_owned(),
            number: Some(1),
            kind: StatementKind::Theorem,
            title: None,
        };
        let mut out = String::new();
        backend().reference(
            &RefContext {
                label: "pigeonhole",
                entry: Some(&entry),
                override_title: Some("the counting argument"),
                current_doc: "intro",
            },
            &mut out,
        );
        assert!(out.contains(">the counting argument</a>"));
    }

    #[test]
    fn test_reference_unnumbered_uses_title() {
        let entry = Entry {
            doc: "intro".to_owned(),
            number: None,
            kind: StatementKind::Proof,
            title: Some("Main proof".to_owned()),
        };
        let mut out = String::new();
        backend().reference(
            &RefContext {
                label: "main-proof",
                entry: Some(&entry),
                override_title: None,
                current_doc: "intro",
            },
            &mut out,
        );
        assert!(out.contains(">Main proof</a>"));
    }

    #[test]
    fn test_reference_dangling_renders_plain() {
        let mut out = String::new();
        backend().reference(
            &RefContext {
                label: "missing",
                entry: None,
                override_title: None,
                current_doc: "intro",
            },
            &mut out,
        );
        assert_eq!(out, "missing");
    }

    #[test]
    fn test_reference_unmapped_kind_falls_back() {
        let mut kinds = KindTable::new();
        kinds.remove_name(StatementKind::Conjecture);
        let backend = HtmlBackend::new(kinds);

        let entry = Entry {
            doc: "intro".to_owned(),
            number: Some(4),
            kind: StatementKind::Conjecture,
            title: None,
        };
        let mut out = String::new();
        backend.reference(
            &RefContext {
                label: "abc",
                entry: Some(&entry),
                override_title: None,
                current_doc: "intro",
            },
            &mut out,
        );
        assert!(out.contains(">(4)</a>"));
    }

    #[test]
    fn test_custom_reference_format() {
        let backend = backend().with_reference_format("{name} no. {number}");
        let entry = Entry {
            doc: "intro".to_owned(),
            number: Some(2),
            kind: StatementKind::Theorem,
            title: None,
        };
        let mut out = String::new();
        backend.reference(
            &RefContext {
                label: "x",
                entry: Some(&entry),
                override_title: None,
                current_doc: "intro",
            },
            &mut out,
        );
        assert!(out.contains(">Theorem no. 2</a>"));
    }

    #[test]
    fn test_finish_converts_markdown() {
        let rendered = backend().finish("**bold** text".to_owned());
        assert!(rendered.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_finish_passes_raw_html_blocks() {
        let rendered = backend().finish(
            "<div class=\"statement\">\n<div class=\"statement-title\"></div>\n\nbody\n\n</div>"
                .to_owned(),
        );
        assert!(rendered.contains(r#"<div class="statement">"#));
        assert!(rendered.contains("<p>body</p>"));
    }
}

//! LaTeX statement backend.
//!
//! Statements map onto theorem environments; numbering is delegated to
//! the LaTeX counter system, so the backend only declares the
//! environments once per build ([`preamble`](StatementBackend::preamble))
//! and never writes literal numbers. This is a deliberate difference
//! from HTML, where numbers are computed and literal.

use std::fmt::Write;

use thm_model::{KindTable, Statement, StatementKind};

use crate::backend::{RefContext, StatementBackend};
use crate::util::escape_latex;

/// LaTeX render backend.
pub struct LatexBackend {
    kinds: KindTable,
    /// Parent counter for numbered environments, e.g. `section` for
    /// `\newtheorem{theorem}{Theorem}[section]`.
    parent_counter: Option<String>,
}

impl LatexBackend {
    /// Create a backend with no parent counter.
    #[must_use]
    pub fn new(kinds: KindTable) -> Self {
        Self {
            kinds,
            parent_counter: None,
        }
    }

    /// Number environments within a parent counter (e.g. `section`).
    #[must_use]
    pub fn with_parent_counter(mut self, counter: impl Into<String>) -> Self {
        self.parent_counter = Some(counter.into());
        self
    }
}

impl StatementBackend for LatexBackend {
    const EXTENSION: &'static str = "tex";

    fn statement_start(&self, statement: &Statement, out: &mut String) {
        write!(out, "\\begin{{{}}}", statement.kind.as_str()).unwrap();
        if let Some(title) = &statement.title {
            write!(out, "[{}]", escape_latex(title)).unwrap();
        }
        if let Some(label) = &statement.label {
            write!(out, "\\label{{{label}}}").unwrap();
        }
    }

    fn statement_end(&self, statement: &Statement, out: &mut String) {
        write!(out, "\\end{{{}}}", statement.kind.as_str()).unwrap();
    }

    fn reference(&self, reference: &RefContext<'_>, out: &mut String) {
        let Some(entry) = reference.entry else {
            out.push_str(&escape_latex(reference.label));
            return;
        };

        if let Some(title) = reference.override_title {
            write!(
                out,
                "\\hyperref[{}]{{{}}}",
                reference.label,
                escape_latex(title)
            )
            .unwrap();
        } else if entry.number.is_some() {
            match self.kinds.human_name(entry.kind) {
                Some(name) => {
                    write!(out, "{}~\\ref{{{}}}", escape_latex(name), reference.label).unwrap();
                }
                None => write!(out, "(\\ref{{{}}})", reference.label).unwrap(),
            }
        } else {
            let text = entry.title.as_deref().unwrap_or(reference.label);
            write!(
                out,
                "\\hyperref[{}]{{{}}}",
                reference.label,
                escape_latex(text)
            )
            .unwrap();
        }
    }

    /// Declare one environment per mapped kind.
    ///
    /// Numbered kinds share no counter; unnumbered kinds use starred
    /// environments. Documents loading amsthm's own `proof` should drop
    /// `proof` from the configured kind map.
    fn preamble(&self, out: &mut String) {
        for kind in StatementKind::ALL {
            let Some(name) = self.kinds.human_name(kind) else {
                continue;
            };
            if self.kinds.is_numbered(kind) {
                write!(out, "\\newtheorem{{{kind}}}{{{name}}}").unwrap();
                if let Some(parent) = &self.parent_counter {
                    write!(out, "[{parent}]").unwrap();
                }
            } else {
                write!(out, "\\newtheorem*{{{kind}}}{{{name}}}").unwrap();
            }
            out.push('\n');
        }
    }
}

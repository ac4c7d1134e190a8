//! Rendering pass: replace directive markup with backend output.
//!
//! Runs after every document has been collected; the registry is
//! read-only here. The renderer walks the source line by line, swaps
//! statement open/close lines for backend markup, substitutes inline
//! references, and hands the result to the backend for finishing.

use thm_model::Statement;
use thm_registry::StatementRegistry;

use crate::backend::{RefContext, StatementBackend};
use crate::directive::{BlockLine, FenceTracker, find_ref, parse_block_line};

/// Result of rendering one document.
#[derive(Debug)]
pub struct RenderedDocument {
    /// Document id.
    pub doc: String,
    /// Finished output in the backend's format.
    pub output: String,
    /// Warnings: dangling references.
    pub warnings: Vec<String>,
}

/// Phase-2 walker: produces backend output for one document at a time.
pub struct DocumentRenderer<'a, B> {
    backend: &'a B,
    registry: &'a StatementRegistry,
}

impl<'a, B: StatementBackend> DocumentRenderer<'a, B> {
    /// Create a renderer over a backend and the completed registry.
    pub fn new(backend: &'a B, registry: &'a StatementRegistry) -> Self {
        Self { backend, registry }
    }

    /// Render one collected document.
    ///
    /// `statements` must be the collection result for the same source:
    /// opening directives are matched to statements positionally, in
    /// source order.
    pub fn render(
        &self,
        doc: &str,
        source: &str,
        statements: &[Statement],
    ) -> RenderedDocument {
        let mut out = String::with_capacity(source.len());
        let mut warnings = Vec::new();
        // Open statements, as indices into `statements`; `None` marks a
        // container directive that is not ours.
        let mut stack: Vec<Option<usize>> = Vec::new();
        let mut cursor = 0;
        let mut fence = FenceTracker::new();

        for (idx, line) in source.lines().enumerate() {
            let line_num = idx + 1;

            fence.update(line);
            if fence.in_fence() {
                out.push_str(line);
                out.push('\n');
                continue;
            }

            match parse_block_line(line) {
                Some(BlockLine::Open(_)) if cursor < statements.len() => {
                    let statement = &statements[cursor];
                    stack.push(Some(cursor));
                    cursor += 1;
                    // Blank lines around the markup keep it a raw block
                    // and the body markdown for the finishing pass.
                    out.push('\n');
                    self.backend.statement_start(statement, &mut out);
                    out.push_str("\n\n");
                }
                Some(BlockLine::ForeignOpen { .. }) => {
                    stack.push(None);
                    out.push_str(line);
                    out.push('\n');
                }
                Some(BlockLine::Close { .. }) => match stack.pop() {
                    Some(Some(statement_idx)) => {
                        out.push('\n');
                        self.backend
                            .statement_end(&statements[statement_idx], &mut out);
                        out.push_str("\n\n");
                    }
                    _ => {
                        out.push_str(line);
                        out.push('\n');
                    }
                },
                _ => {
                    self.substitute_refs(doc, line_num, line, &mut out, &mut warnings);
                    out.push('\n');
                }
            }
        }

        RenderedDocument {
            doc: doc.to_owned(),
            output: self.backend.finish(out),
            warnings,
        }
    }

    /// Copy one line, replacing every `:ref[...]` token with backend
    /// output. Unknown labels render as inert text and warn once per
    /// site.
    fn substitute_refs(
        &self,
        doc: &str,
        line_num: usize,
        line: &str,
        out: &mut String,
        warnings: &mut Vec<String>,
    ) {
        let mut pos = 0;
        while let Some(token) = find_ref(line, pos) {
            out.push_str(&line[pos..token.start]);

            let entry = self.registry.resolve(&token.label);
            if entry.is_none() {
                warnings.push(format!(
                    "{doc}:{line_num}: unresolved reference `{}`",
                    token.label
                ));
            }
            let reference = RefContext {
                label: &token.label,
                entry,
                override_title: token.title.as_deref(),
                current_doc: doc,
            };
            self.backend.reference(&reference, out);

            pos = token.end;
        }
        out.push_str(&line[pos..]);
    }
}

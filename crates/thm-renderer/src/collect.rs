//! Collection pass: parse statements and populate the registry.
//!
//! Runs once per document before any rendering. Registration happens
//! here, not at render time: a cross-reference in an earlier document
//! can only resolve a statement from a later one after every document
//! has been collected.

use thm_model::{KindTable, Statement};
use thm_registry::StatementRegistry;

use crate::directive::{BlockLine, FenceTracker, StatementOpen, parse_block_line};

/// Result of collecting one document.
#[derive(Debug)]
pub struct CollectedDocument {
    /// Document id.
    pub doc: String,
    /// Statements in source order (outer before nested).
    pub statements: Vec<Statement>,
    /// Warnings: duplicate labels, stray or missing closings.
    pub warnings: Vec<String>,
}

/// Stack frame for one open container.
enum Frame {
    /// Index into the collected statements.
    Statement(usize),
    /// Container directive we do not own; tracked only so its closing
    /// `:::` is matched correctly.
    Foreign,
}

/// Phase-1 walker: builds [`Statement`]s and registers their labels.
pub struct StatementCollector<'a> {
    kinds: &'a KindTable,
    registry: &'a mut StatementRegistry,
}

impl<'a> StatementCollector<'a> {
    /// Create a collector over a shared kind table and the build's
    /// registry.
    pub fn new(kinds: &'a KindTable, registry: &'a mut StatementRegistry) -> Self {
        Self { kinds, registry }
    }

    /// Collect all statements from one document.
    ///
    /// Statements of numbered kinds and statements with explicit labels
    /// are registered exactly once; unnumbered, unlabeled statements
    /// never reach the registry. Under the per-section numbering policy
    /// every top-level `#` heading starts a new counter scope.
    pub fn collect(&mut self, doc: &str, source: &str) -> CollectedDocument {
        let mut statements: Vec<Statement> = Vec::new();
        let mut warnings = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut fence = FenceTracker::new();

        for (idx, line) in source.lines().enumerate() {
            let line_num = idx + 1;

            fence.update(line);
            if fence.in_fence() {
                append_body(&stack, &mut statements, line);
                continue;
            }

            match parse_block_line(line) {
                Some(BlockLine::Open(open)) => {
                    append_body(&stack, &mut statements, line);
                    let statement = self.register(doc, line_num, open, &mut warnings);
                    statements.push(statement);
                    stack.push(Frame::Statement(statements.len() - 1));
                }
                Some(BlockLine::ForeignOpen { .. }) => {
                    append_body(&stack, &mut statements, line);
                    stack.push(Frame::Foreign);
                }
                Some(BlockLine::Close { .. }) => {
                    if stack.pop().is_none() {
                        warnings.push(format!(
                            "{doc}:{line_num}: stray ::: with no opening directive"
                        ));
                    }
                    append_body(&stack, &mut statements, line);
                }
                None => {
                    if stack.is_empty() && is_top_heading(line) {
                        self.registry.enter_section();
                    }
                    append_body(&stack, &mut statements, line);
                }
            }
        }

        for frame in stack {
            if let Frame::Statement(idx) = frame {
                let statement = &statements[idx];
                warnings.push(format!(
                    "{}: unclosed :::{} (missing closing :::)",
                    statement.location(),
                    statement.kind
                ));
            }
        }

        CollectedDocument {
            doc: doc.to_owned(),
            statements,
            warnings,
        }
    }

    /// Build and register one statement node.
    ///
    /// A duplicate explicit label produces one warning naming both
    /// documents; the statement proceeds under a synthesized label.
    fn register(
        &mut self,
        doc: &str,
        line: usize,
        open: StatementOpen,
        warnings: &mut Vec<String>,
    ) -> Statement {
        let numbered = self.kinds.is_numbered(open.kind);
        let title = open.title.as_deref();

        let (label, explicit_label, number) = match open.label {
            Some(explicit) => {
                match self
                    .registry
                    .register(doc, &explicit, open.kind, numbered, title)
                {
                    Ok(registered) => (Some(registered.label), true, registered.number),
                    Err(err) => {
                        warnings.push(format!("{doc}:{line}: {err}"));
                        let registered =
                            self.registry.register_anonymous(doc, open.kind, numbered, title);
                        (Some(registered.label), false, registered.number)
                    }
                }
            }
            None if numbered => {
                let registered = self.registry.register_anonymous(doc, open.kind, numbered, title);
                (Some(registered.label), false, registered.number)
            }
            // Unnumbered and unlabeled: invisible to cross-references.
            None => (None, false, None),
        };

        Statement {
            kind: open.kind,
            title: open.title,
            label,
            explicit_label,
            body: Vec::new(),
            doc: doc.to_owned(),
            line,
            number,
        }
    }
}

/// Append a body line to every statement currently open.
///
/// Nested blocks are part of their enclosing statement's content, so
/// the line goes to all open frames, not just the innermost.
fn append_body(stack: &[Frame], statements: &mut [Statement], line: &str) {
    for frame in stack {
        if let Frame::Statement(idx) = frame {
            statements[*idx].body.push(line.to_owned());
        }
    }
}

/// Top-level `#` heading (exactly one hash).
fn is_top_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.strip_prefix('#').is_some_and(|rest| rest.starts_with(' '))
}

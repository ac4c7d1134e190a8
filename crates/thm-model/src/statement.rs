//! Statement node: one parsed theorem-like block.

use crate::kind::StatementKind;

/// One statement block parsed from a source document.
///
/// Built during the collection phase; the renderer consumes it as-is.
/// The body is kept as raw markdown lines and handed to the markdown
/// pipeline by the backend, so titles and bodies keep their inline
/// formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    /// Statement category.
    pub kind: StatementKind,
    /// Optional one-line title, verbatim from the directive argument.
    pub title: Option<String>,
    /// Label the statement was registered under.
    ///
    /// Either the explicit `{#label}` from the source or a synthesized
    /// `{doc}:{index}` label. `None` for unnumbered statements without
    /// an explicit label; those never reach the registry.
    pub label: Option<String>,
    /// Whether the label was written in the source.
    pub explicit_label: bool,
    /// Raw markdown body lines.
    pub body: Vec<String>,
    /// Owning document id.
    pub doc: String,
    /// 1-indexed line of the opening directive.
    pub line: usize,
    /// Sequence number, assigned at registration for numbered kinds.
    pub number: Option<u64>,
}

impl Statement {
    /// Source location as `doc:line` for warnings.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}:{}", self.doc, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_location() {
        let st = Statement {
            kind: StatementKind::Lemma,
            title: None,
            label: Some("intro:1".to_owned()),
            explicit_label: false,
            body: vec![],
            doc: "intro".to_owned(),
            line: 12,
            number: Some(2),
        };
        assert_eq!(st.location(), "intro:12");
    }
}

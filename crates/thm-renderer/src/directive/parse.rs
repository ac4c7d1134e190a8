//! Block directive line parsing.
//!
//! A statement block takes whole lines:
//!
//! ```markdown
//! :::theorem[Pigeonhole]{#pigeonhole}
//! body
//! :::
//! ```

use thm_model::StatementKind;

/// Opening line of a statement block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOpen {
    /// Statement category.
    pub kind: StatementKind,
    /// Title from the bracket argument, if non-empty.
    pub title: Option<String>,
    /// Explicit label from `{#label}`, if present.
    pub label: Option<String>,
    /// Number of opening colons (3 or more; more colons nest).
    pub colon_count: usize,
}

/// A line that participates in block structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLine {
    /// Opens a statement block of a known kind.
    Open(StatementOpen),
    /// Opens a container directive we do not own; passed through, but
    /// tracked so its closing `:::` is not mistaken for ours.
    ForeignOpen {
        /// Directive name.
        name: String,
        /// Number of opening colons.
        colon_count: usize,
    },
    /// Closes the innermost open container.
    Close {
        /// Number of closing colons.
        colon_count: usize,
    },
}

/// Parse a line for block directive structure.
///
/// Returns `None` for ordinary lines.
#[must_use]
pub fn parse_block_line(line: &str) -> Option<BlockLine> {
    let trimmed = line.trim();
    if !trimmed.starts_with(":::") {
        return None;
    }

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    let after_colons = trimmed[colon_count..].trim();

    if after_colons.is_empty() {
        return Some(BlockLine::Close { colon_count });
    }

    let name_end = after_colons
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let Some(kind) = StatementKind::from_name(name) else {
        return Some(BlockLine::ForeignOpen {
            name: name.to_owned(),
            colon_count,
        });
    };

    let after_name = after_colons[name_end..].trim_start();
    let (title, consumed) = parse_brackets(after_name);
    let after_title = after_name[consumed..].trim_start();
    let (attrs, _) = parse_braces(after_title);
    let label = parse_id(&attrs);

    Some(BlockLine::Open(StatementOpen {
        kind,
        title: if title.is_empty() { None } else { Some(title) },
        label,
        colon_count,
    }))
}

/// Valid directive names contain only alphanumerics, `-` and `_`.
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse `[content]`, handling nested brackets.
///
/// Returns (content, bytes consumed). Unclosed brackets consume
/// nothing.
pub(crate) fn parse_brackets(s: &str) -> (String, usize) {
    if !s.starts_with('[') {
        return (String::new(), 0);
    }

    let mut depth = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return (s[1..i].to_owned(), i + 1);
                }
            }
            _ => {}
        }
    }
    (String::new(), 0)
}

/// Parse `{attrs}`, handling nested braces.
///
/// Returns (attrs without braces, bytes consumed).
pub(crate) fn parse_braces(s: &str) -> (String, usize) {
    if !s.starts_with('{') {
        return (String::new(), 0);
    }

    let mut depth = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (s[1..i].to_owned(), i + 1);
                }
            }
            _ => {}
        }
    }
    (String::new(), 0)
}

/// Extract the `#id` token from an attribute string.
fn parse_id(attrs: &str) -> Option<String> {
    for token in attrs.split_whitespace() {
        if let Some(id) = token.strip_prefix('#') {
            if !id.is_empty() {
                return Some(id.to_owned());
            }
        }
    }
    None
}

/// Parse a `key="value"` attribute from an attribute string.
///
/// Supports double quotes, single quotes and unquoted values, like the
/// rest of the directive attribute grammar.
pub(crate) fn parse_attr(attrs: &str, key: &str) -> Option<String> {
    let mut remaining = attrs;
    while let Some(eq) = remaining.find('=') {
        let found_key = remaining[..eq].rsplit(char::is_whitespace).next()?.trim();
        let after_eq = &remaining[eq + 1..];

        let (value, rest) = if let Some(stripped) = after_eq.strip_prefix('"') {
            let end = stripped.find('"')?;
            (&stripped[..end], &stripped[end + 1..])
        } else if let Some(stripped) = after_eq.strip_prefix('\'') {
            let end = stripped.find('\'')?;
            (&stripped[..end], &stripped[end + 1..])
        } else {
            let end = after_eq
                .find(char::is_whitespace)
                .unwrap_or(after_eq.len());
            (&after_eq[..end], &after_eq[end..])
        };

        if found_key == key {
            return Some(value.to_owned());
        }
        remaining = rest;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_open() {
        let parsed = parse_block_line(":::theorem").unwrap();
        assert_eq!(
            parsed,
            BlockLine::Open(StatementOpen {
                kind: StatementKind::Theorem,
                title: None,
                label: None,
                colon_count: 3,
            })
        );
    }

    #[test]
    fn test_open_with_title_and_label() {
        let parsed = parse_block_line(":::theorem[Pigeonhole]{#pigeonhole}").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.kind, StatementKind::Theorem);
        assert_eq!(open.title.as_deref(), Some("Pigeonhole"));
        assert_eq!(open.label.as_deref(), Some("pigeonhole"));
    }

    #[test]
    fn test_open_with_space_after_colons() {
        let parsed = parse_block_line("::: lemma [Key step]").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.kind, StatementKind::Lemma);
        assert_eq!(open.title.as_deref(), Some("Key step"));
    }

    #[test]
    fn test_nested_brackets_in_title() {
        let parsed = parse_block_line(":::definition[Order [of a group]]").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.title.as_deref(), Some("Order [of a group]"));
    }

    #[test]
    fn test_label_only() {
        let parsed = parse_block_line(":::proof{#main-proof}").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.kind, StatementKind::Proof);
        assert_eq!(open.title, None);
        assert_eq!(open.label.as_deref(), Some("main-proof"));
    }

    #[test]
    fn test_close() {
        assert_eq!(
            parse_block_line(":::"),
            Some(BlockLine::Close { colon_count: 3 })
        );
        assert_eq!(
            parse_block_line("::::  "),
            Some(BlockLine::Close { colon_count: 4 })
        );
    }

    #[test]
    fn test_nested_open_colon_count() {
        let parsed = parse_block_line("::::proof").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.colon_count, 4);
    }

    #[test]
    fn test_foreign_container() {
        let parsed = parse_block_line(":::note[Heads up]").unwrap();
        assert_eq!(
            parsed,
            BlockLine::ForeignOpen {
                name: "note".to_owned(),
                colon_count: 3,
            }
        );
    }

    #[test]
    fn test_not_a_directive() {
        assert_eq!(parse_block_line("regular text"), None);
        assert_eq!(parse_block_line("::twocolons"), None);
        assert_eq!(parse_block_line(""), None);
    }

    #[test]
    fn test_invalid_name() {
        assert_eq!(parse_block_line(":::foo@bar"), None);
    }

    #[test]
    fn test_empty_title_brackets() {
        let parsed = parse_block_line(":::theorem[]").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.title, None);
    }

    #[test]
    fn test_unclosed_brackets_ignored() {
        let parsed = parse_block_line(":::theorem[unclosed").unwrap();
        let BlockLine::Open(open) = parsed else {
            panic!("expected statement open");
        };
        assert_eq!(open.title, None);
    }

    #[test]
    fn test_parse_attr() {
        assert_eq!(
            parse_attr(r#"title="the lemma""#, "title"),
            Some("the lemma".to_owned())
        );
        assert_eq!(
            parse_attr("title='single'", "title"),
            Some("single".to_owned())
        );
        assert_eq!(parse_attr("title=bare", "title"), Some("bare".to_owned()));
        assert_eq!(parse_attr("other=1", "title"), None);
        assert_eq!(parse_attr("", "title"), None);
    }
}

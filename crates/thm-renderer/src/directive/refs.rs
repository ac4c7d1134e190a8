//! Inline reference parsing: `:ref[label]{title="override"}`.

use super::parse::{parse_attr, parse_braces, parse_brackets};

/// One reference token found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefToken {
    /// Referenced label.
    pub label: String,
    /// Explicit override title from `{title="..."}`.
    pub title: Option<String>,
    /// Byte offset of the token start in the line.
    pub start: usize,
    /// Byte offset one past the token end.
    pub end: usize,
}

/// Find the first reference token in a line, searching from `from`.
///
/// Returns `None` when the rest of the line holds no reference. A
/// `:ref` with empty or unclosed brackets is not a reference.
#[must_use]
pub fn find_ref(line: &str, from: usize) -> Option<RefToken> {
    let mut search = from;
    while let Some(found) = line[search..].find(":ref[") {
        let start = search + found;

        // `::ref[...]` is not the inline form; skip past it.
        if start > 0 && line[..start].ends_with(':') {
            search = start + 1;
            continue;
        }

        let after_name = &line[start + ":ref".len()..];
        let (label, consumed) = parse_brackets(after_name);
        if label.is_empty() {
            search = start + ":ref[".len();
            continue;
        }

        let after_label = &after_name[consumed..];
        let (attrs, attrs_consumed) = parse_braces(after_label);
        let title = parse_attr(&attrs, "title");

        return Some(RefToken {
            label,
            title,
            start,
            end: start + ":ref".len() + consumed + attrs_consumed,
        });
    }
    None
}

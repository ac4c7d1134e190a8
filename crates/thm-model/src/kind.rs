//! Statement kind enumeration and per-build kind configuration.

use std::collections::{HashMap, HashSet};

/// Category of a theorem-like statement block.
///
/// The set is fixed: directives are registered per kind, and renderers
/// key their styling and LaTeX environments off the kind name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatementKind {
    Theorem,
    Lemma,
    Proof,
    Definition,
    Example,
    Conjecture,
    Algorithm,
    Corollary,
    Property,
    Observation,
}

impl StatementKind {
    /// All kinds, in directive-registration order.
    pub const ALL: [Self; 10] = [
        Self::Theorem,
        Self::Lemma,
        Self::Proof,
        Self::Definition,
        Self::Example,
        Self::Conjecture,
        Self::Algorithm,
        Self::Corollary,
        Self::Property,
        Self::Observation,
    ];

    /// Directive name for this kind (e.g. `theorem` in `:::theorem`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theorem => "theorem",
            Self::Lemma => "lemma",
            Self::Proof => "proof",
            Self::Definition => "definition",
            Self::Example => "example",
            Self::Conjecture => "conjecture",
            Self::Algorithm => "algorithm",
            Self::Corollary => "corollary",
            Self::Property => "property",
            Self::Observation => "observation",
        }
    }

    /// Parse a directive name into a kind.
    ///
    /// Returns `None` for names outside the fixed set, so unknown
    /// directives pass through the renderer untouched.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Built-in English display name.
    #[must_use]
    pub fn default_display_name(self) -> &'static str {
        match self {
            Self::Theorem => "Theorem",
            Self::Lemma => "Lemma",
            Self::Proof => "Proof",
            Self::Definition => "Definition",
            Self::Example => "Example",
            Self::Conjecture => "Conjecture",
            Self::Algorithm => "Algorithm",
            Self::Corollary => "Corollary",
            Self::Property => "Property",
            Self::Observation => "Observation",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-build kind configuration.
///
/// Maps each kind to a human-readable display name and records which
/// kinds are excluded from sequential numbering. The default table uses
/// the built-in English names and leaves only `proof` unnumbered.
///
/// A kind can be dropped from the name map via configuration; callers
/// see `None` from [`human_name`](Self::human_name) and fall back to a
/// bare `(n)` reference format.
#[derive(Debug, Clone)]
pub struct KindTable {
    names: HashMap<StatementKind, String>,
    unnumbered: HashSet<StatementKind>,
}

impl Default for KindTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KindTable {
    /// Create the default table: built-in names, `proof` unnumbered.
    #[must_use]
    pub fn new() -> Self {
        let names = StatementKind::ALL
            .into_iter()
            .map(|k| (k, k.default_display_name().to_owned()))
            .collect();
        let mut unnumbered = HashSet::new();
        unnumbered.insert(StatementKind::Proof);
        Self { names, unnumbered }
    }

    /// Replace the display name for a kind.
    pub fn set_name(&mut self, kind: StatementKind, name: impl Into<String>) {
        self.names.insert(kind, name.into());
    }

    /// Remove a kind from the name map entirely.
    ///
    /// References to statements of this kind render with the generic
    /// `(n)` format.
    pub fn remove_name(&mut self, kind: StatementKind) {
        self.names.remove(&kind);
    }

    /// Mark a kind as excluded from numbering.
    pub fn set_unnumbered(&mut self, kind: StatementKind) {
        self.unnumbered.insert(kind);
    }

    /// Mark a kind as numbered.
    pub fn set_numbered(&mut self, kind: StatementKind) {
        self.unnumbered.remove(&kind);
    }

    /// Display name for a kind, if it is still mapped.
    #[must_use]
    pub fn human_name(&self, kind: StatementKind) -> Option<&str> {
        self.names.get(&kind).map(String::as_str)
    }

    /// Whether statements of this kind receive sequence numbers.
    #[must_use]
    pub fn is_numbered(&self, kind: StatementKind) -> bool {
        !self.unnumbered.contains(&kind)
    }

    /// Kinds excluded from numbering, in registration order.
    pub fn unnumbered_kinds(&self) -> impl Iterator<Item = StatementKind> + '_ {
        StatementKind::ALL
            .into_iter()
            .filter(|k| self.unnumbered.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_name_round_trip() {
        for kind in StatementKind::ALL {
            assert_eq!(StatementKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(StatementKind::from_name("axiom"), None);
        assert_eq!(StatementKind::from_name(""), None);
        assert_eq!(StatementKind::from_name("Theorem"), None);
    }

    #[test]
    fn test_default_table_names() {
        let table = KindTable::new();
        assert_eq!(table.human_name(StatementKind::Theorem), Some("Theorem"));
        assert_eq!(table.human_name(StatementKind::Proof), Some("Proof"));
    }

    #[test]
    fn test_default_table_numbering() {
        let table = KindTable::new();
        assert!(table.is_numbered(StatementKind::Theorem));
        assert!(table.is_numbered(StatementKind::Lemma));
        assert!(!table.is_numbered(StatementKind::Proof));
    }

    #[test]
    fn test_set_name() {
        let mut table = KindTable::new();
        table.set_name(StatementKind::Theorem, "Théorème");
        assert_eq!(table.human_name(StatementKind::Theorem), Some("Théorème"));
    }

    #[test]
    fn test_remove_name() {
        let mut table = KindTable::new();
        table.remove_name(StatementKind::Conjecture);
        assert_eq!(table.human_name(StatementKind::Conjecture), None);
    }

    #[test]
    fn test_toggle_numbering() {
        let mut table = KindTable::new();
        table.set_unnumbered(StatementKind::Example);
        assert!(!table.is_numbered(StatementKind::Example));
        table.set_numbered(StatementKind::Example);
        assert!(table.is_numbered(StatementKind::Example));
    }

    #[test]
    fn test_unnumbered_kinds_iterator() {
        let mut table = KindTable::new();
        table.set_unnumbered(StatementKind::Observation);
        let kinds: Vec<_> = table.unnumbered_kinds().collect();
        assert_eq!(
            kinds,
            vec![StatementKind::Proof, StatementKind::Observation]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(StatementKind::Corollary.to_string(), "corollary");
    }
}

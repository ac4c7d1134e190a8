//! Statement numbering and cross-reference registry.
//!
//! The registry is the one piece of shared state in a build: a mapping
//! from label to [`Entry`] (owning document, sequence number, kind).
//! It is owned by the build driver and passed by reference into the
//! collection and render phases, never ambient global state.
//!
//! Lifecycle: created empty at build start, populated monotonically
//! during collection, read-only during rendering. Incremental rebuilds
//! [`clear`](StatementRegistry::clear) one document and re-collect it;
//! parallel document-group builds combine fragments through
//! [`merge`](StatementRegistry::merge).

use std::collections::{HashMap, HashSet};

use thm_model::StatementKind;

/// Registry value: what a label resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Owning document id.
    pub doc: String,
    /// Sequence number; `None` for unnumbered kinds (references fall
    /// back to the statement title).
    pub number: Option<u64>,
    /// Statement kind.
    pub kind: StatementKind,
    /// Statement title, if any.
    pub title: Option<String>,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// Label the statement was stored under (explicit or synthesized).
    pub label: String,
    /// Assigned sequence number, for numbered statements.
    pub number: Option<u64>,
}

/// Error for a label registered twice within one build.
///
/// Reported as a build warning; the second statement is re-registered
/// under a synthesized label and the build proceeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate label `{label}`: first defined in `{first_doc}`, redefined in `{second_doc}`")]
pub struct DuplicateLabel {
    /// The colliding label.
    pub label: String,
    /// Document that registered the label first.
    pub first_doc: String,
    /// Document attempting the second registration.
    pub second_doc: String,
}

/// How sequence numbers are assigned across a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberingPolicy {
    /// One counter for the whole build, in source-processing order.
    #[default]
    Global,
    /// Counter resets at each new parent section
    /// ([`enter_section`](StatementRegistry::enter_section)).
    PerSection,
}

/// Label → [`Entry`] registry with sequential numbering.
#[derive(Debug, Default)]
pub struct StatementRegistry {
    entries: HashMap<String, Entry>,
    policy: NumberingPolicy,
    /// Numbers handed out so far under the current counter scope.
    counter: u64,
    /// Per-document running index for synthesized labels. Reset by
    /// [`clear`](Self::clear) so re-collected documents synthesize the
    /// same labels.
    synth: HashMap<String, u64>,
}

impl StatementRegistry {
    /// Create an empty registry with the global numbering policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with an explicit numbering policy.
    #[must_use]
    pub fn with_policy(policy: NumberingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Register a statement under an explicit label.
    ///
    /// Numbers are assigned only when `numbered` is true; they are
    /// strictly increasing in call order, starting at 1, and never
    /// reused after [`clear`](Self::clear).
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateLabel`] when the label is already present.
    /// The prior entry is left intact; callers report the error as a
    /// build warning and fall back to
    /// [`register_anonymous`](Self::register_anonymous).
    pub fn register(
        &mut self,
        doc: &str,
        label: &str,
        kind: StatementKind,
        numbered: bool,
        title: Option<&str>,
    ) -> Result<Registered, DuplicateLabel> {
        if let Some(existing) = self.entries.get(label) {
            return Err(DuplicateLabel {
                label: label.to_owned(),
                first_doc: existing.doc.clone(),
                second_doc: doc.to_owned(),
            });
        }
        Ok(self.insert(doc, label.to_owned(), kind, numbered, title))
    }

    /// Register a statement without an explicit label.
    ///
    /// Synthesizes a `{doc}:{index}` label from a per-document running
    /// index; cannot collide, so registration cannot fail.
    pub fn register_anonymous(
        &mut self,
        doc: &str,
        kind: StatementKind,
        numbered: bool,
        title: Option<&str>,
    ) -> Registered {
        let label = self.synthesize_label(doc);
        self.insert(doc, label, kind, numbered, title)
    }

    fn insert(
        &mut self,
        doc: &str,
        label: String,
        kind: StatementKind,
        numbered: bool,
        title: Option<&str>,
    ) -> Registered {
        let number = if numbered {
            self.counter += 1;
            Some(self.counter)
        } else {
            None
        };

        self.entries.insert(
            label.clone(),
            Entry {
                doc: doc.to_owned(),
                number,
                kind,
                title: title.map(str::to_owned),
            },
        );

        Registered { label, number }
    }

    /// Look up a label. Pure lookup, no mutation.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&Entry> {
        self.entries.get(label)
    }

    /// Start a new parent section.
    ///
    /// Under [`NumberingPolicy::PerSection`] this resets the sequence
    /// counter; under the global policy it is a no-op.
    pub fn enter_section(&mut self) {
        if self.policy == NumberingPolicy::PerSection {
            self.counter = 0;
        }
    }

    /// Remove all entries owned by `doc`.
    ///
    /// Used when a document is invalidated and re-collected. The
    /// sequence counter is not rewound, so numbers are never reused.
    pub fn clear(&mut self, doc: &str) {
        self.entries.retain(|_, entry| entry.doc != doc);
        self.synth.remove(doc);
    }

    /// Import entries computed elsewhere (parallel document groups).
    ///
    /// Only entries for documents in `allowed_docs` are imported; each
    /// overwrites any previous entry for the same label, so the last
    /// writer for a batch wins regardless of worker completion order.
    /// Merging the same entry set twice is a no-op.
    pub fn merge<I>(&mut self, entries: I, allowed_docs: &HashSet<String>)
    where
        I: IntoIterator<Item = (String, Entry)>,
    {
        for (label, entry) in entries {
            if !allowed_docs.contains(&entry.doc) {
                tracing::warn!(
                    label = %label,
                    doc = %entry.doc,
                    "Skipping merged entry for document outside the allowed set"
                );
                continue;
            }
            // Keep the counter ahead of imported numbers so later
            // registrations stay strictly increasing.
            if let Some(number) = entry.number {
                self.counter = self.counter.max(number);
            }
            self.entries.insert(label, entry);
        }
    }

    /// Iterate over all entries (unspecified order).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(label, entry)| (label.as_str(), entry))
    }

    /// Consume the registry into its entries, for merging into another.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Entry)> {
        self.entries.into_iter()
    }

    /// Number of registered labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next unused `{doc}:{index}` label for `doc`.
    ///
    /// Skips indices taken by explicit labels that happen to use the
    /// same shape.
    fn synthesize_label(&mut self, doc: &str) -> String {
        loop {
            let index = self.synth.entry(doc.to_owned()).or_insert(0);
            *index += 1;
            let candidate = format!("{doc}:{index}");
            if !self.entries.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

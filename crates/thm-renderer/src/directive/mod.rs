//! Statement directive grammar.
//!
//! Two constructs, both in CommonMark directive syntax:
//!
//! - Block: `:::kind[Title]{#label}` ... `:::` is one statement; the
//!   bracket argument is an optional one-line title, `{#label}` an
//!   optional explicit label. Four or more colons nest.
//! - Inline: `:ref[label]` / `:ref[label]{title="override"}` is a
//!   cross-reference to a labeled statement, anywhere in a line.
//!
//! Directive syntax inside fenced code blocks is never interpreted;
//! both processing passes track fences with [`FenceTracker`].

mod fence;
mod parse;
mod refs;

pub(crate) use fence::FenceTracker;
pub use parse::{BlockLine, StatementOpen, parse_block_line};
pub use refs::{RefToken, find_ref};

//! Statement kinds and node types for thm.
//!
//! This crate provides the data model shared by the collector, registry
//! and renderers:
//!
//! - [`StatementKind`]: the fixed set of theorem-like block categories
//! - [`KindTable`]: per-build kind configuration (display names, which
//!   kinds participate in numbering)
//! - [`Statement`]: one parsed statement block

mod kind;
mod statement;

pub use kind::{KindTable, StatementKind};
pub use statement::Statement;

//! Statement directive parsing and rendering.
//!
//! Documents mark statements up with CommonMark container directives
//! and reference them with an inline directive:
//!
//! ```markdown
//! :::theorem[Pigeonhole]{#pigeonhole}
//! If $n$ items are put into $m < n$ containers, some container holds
//! more than one item.
//! :::
//!
//! By :ref[pigeonhole], the schedule has a collision.
//! ```
//!
//! Processing is two-phase:
//!
//! 1. **Collection** ([`StatementCollector`]): every document is walked
//!    once, statements are built and registered, numbers are assigned.
//!    Only after all documents are collected can cross-references in an
//!    earlier document see statements from a later one.
//! 2. **Rendering** ([`DocumentRenderer`]): statement markup and ref
//!    tokens are replaced with backend output against the now-complete,
//!    read-only registry.
//!
//! Output formats implement [`StatementBackend`]; [`HtmlBackend`] and
//! [`LatexBackend`] are provided. Adding a format is one new impl, with
//! no change to the node model or the registry.

mod backend;
mod collect;
pub mod directive;
mod html;
mod latex;
mod render;
mod util;

pub use backend::{RefContext, StatementBackend};
pub use collect::{CollectedDocument, StatementCollector};
pub use html::HtmlBackend;
pub use latex::LatexBackend;
pub use render::{DocumentRenderer, RenderedDocument};
pub use util::escape_html;

//! CLI command implementations.

mod build;
mod check;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

use clap::ValueEnum;
use thm_config::OutputFormat;

/// Output format CLI argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum FormatArg {
    /// Standalone HTML fragments, one per document.
    Html,
    /// LaTeX fragments plus a shared `preamble.tex`.
    Latex,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Html => Self::Html,
            FormatArg::Latex => Self::Latex,
        }
    }
}

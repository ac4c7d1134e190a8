//! `thm build` command implementation.

use std::path::PathBuf;

use clap::Args;
use thm_build::BuildDriver;
use thm_config::{CliSettings, Config};

use crate::commands::FormatArg;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover thm.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long)]
    format: Option<FormatArg>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or an output cannot be
    /// written. Statement-level problems are printed as warnings and do
    /// not fail the build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            format: self.format.map(Into::into),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let output_dir = config.docs_resolved.output_dir.clone();

        let mut driver = BuildDriver::new(config);
        let collected = driver.collect_all()?;
        if self.verbose {
            output.info(&format!("Collected {} document(s)", collected.documents));
        }
        let rendered = driver.render_all()?;

        for warning in collected.warnings.iter().chain(&rendered.warnings) {
            output.warning(&format!("warning: {warning}"));
        }

        output.success(&format!(
            "Rendered {} document(s) to {}",
            rendered.documents,
            output_dir.display()
        ));
        Ok(())
    }
}

//! `thm check` command implementation.

use std::path::PathBuf;

use clap::Args;
use thm_build::BuildDriver;
use thm_config::{CliSettings, Config};

use crate::commands::FormatArg;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover thm.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output format to check against (overrides config).
    #[arg(short, long)]
    format: Option<FormatArg>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Collects and renders every document without writing outputs.
    /// Any warning (duplicate label, dangling reference, unclosed
    /// block) fails the check.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a source file cannot be
    /// read, or warnings were found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: None,
            format: self.format.map(Into::into),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let mut driver = BuildDriver::new(config);
        let collected = driver.collect_all()?;
        let checked = driver.check();

        let warnings: Vec<&String> = collected
            .warnings
            .iter()
            .chain(&checked.warnings)
            .collect();
        for warning in &warnings {
            output.warning(&format!("warning: {warning}"));
        }

        if warnings.is_empty() {
            output.success(&format!("Checked {} document(s)", checked.documents));
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "check failed with {} warning(s)",
                warnings.len()
            )))
        }
    }
}

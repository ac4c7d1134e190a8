//! Configuration management for thm.
//!
//! Parses `thm.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thm_model::{KindTable, StatementKind};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "thm.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override output format.
    pub format: Option<OutputFormat>,
}

/// Output format for rendered documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone HTML fragments, one per document.
    #[default]
    Html,
    /// LaTeX fragments plus a shared `preamble.tex`.
    Latex,
}

/// Statement numbering policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingPolicy {
    /// One sequence across the whole build.
    #[default]
    Global,
    /// The sequence restarts at every top-level heading.
    PerSection,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Numbering configuration.
    pub numbering: NumberingConfig,
    /// Statement-kind configuration.
    kinds: KindsConfigRaw,
    /// HTML output configuration.
    pub html: HtmlConfig,
    /// LaTeX output configuration.
    pub latex: LatexConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    format: Option<OutputFormat>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Output directory for rendered documents.
    pub output_dir: PathBuf,
    /// Output format.
    pub format: OutputFormat,
}

/// Numbering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    /// Numbering policy.
    pub policy: NumberingPolicy,
}

/// Raw statement-kind configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KindsConfigRaw {
    /// Kind name → display name. A non-empty map replaces the built-in
    /// names entirely; kinds it omits render with a bare number.
    names: HashMap<String, String>,
    /// Kinds rendered without a number. Replaces the default set.
    unnumbered: Option<Vec<String>>,
}

/// HTML output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Statement title-line template (`{name}`, `{number}`).
    pub title_template: String,
    /// Cross-reference text format (`{name}`, `{number}`).
    pub reference_format: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title_template: "{name} {number}".to_owned(),
            reference_format: "{name} {number}".to_owned(),
        }
    }
}

/// LaTeX output configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LatexConfig {
    /// Parent counter for `\newtheorem` declarations (e.g. "section").
    pub parent_counter: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `thm.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(format) = settings.format {
            self.docs_resolved.format = format;
        }
    }

    /// Build the kind table described by the `[kinds]` section.
    ///
    /// A non-empty `names` map replaces the built-in display names;
    /// `unnumbered` replaces the default unnumbered set. Entries naming
    /// an unknown kind are skipped with a warning.
    #[must_use]
    pub fn kind_table(&self) -> KindTable {
        let mut table = KindTable::new();

        if !self.kinds.names.is_empty() {
            for kind in StatementKind::ALL {
                table.remove_name(kind);
            }
            for (name, display) in &self.kinds.names {
                match StatementKind::from_name(name) {
                    Some(kind) => table.set_name(kind, display.clone()),
                    None => tracing::warn!(kind = %name, "unknown statement kind in [kinds] names"),
                }
            }
        }

        if let Some(unnumbered) = &self.kinds.unnumbered {
            for kind in StatementKind::ALL {
                table.set_numbered(kind);
            }
            for name in unnumbered {
                match StatementKind::from_name(name) {
                    Some(kind) => table.set_unnumbered(kind),
                    None => {
                        tracing::warn!(kind = %name, "unknown statement kind in [kinds] unnumbered");
                    }
                }
            }
        }

        table
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            numbering: NumberingConfig::default(),
            kinds: KindsConfigRaw::default(),
            html: HtmlConfig::default(),
            latex: LatexConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("build"),
                format: OutputFormat::default(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::parse(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration content, resolving paths against `config_dir`.
    fn parse(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve_paths(config_dir);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.html.title_template, "html.title_template")?;
        require_non_empty(&self.html.reference_format, "html.reference_format")?;
        if let Some(counter) = &self.latex.parent_counter {
            require_non_empty(counter, "latex.parent_counter")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "build"),
            format: self.docs.format.unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/build"));
        assert_eq!(config.docs_resolved.format, OutputFormat::Html);
        assert_eq!(config.numbering.policy, NumberingPolicy::Global);
        assert_eq!(config.html.title_template, "{name} {number}");
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[docs]
source_dir = "notes"
output_dir = "out"
format = "latex"

[numbering]
policy = "per-section"

[html]
title_template = "{name} {number}."
reference_format = "{name} {number}"

[latex]
parent_counter = "section"
"#;
        let config = Config::parse(content, Path::new("/proj")).unwrap();
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/proj/notes"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/proj/out"));
        assert_eq!(config.docs_resolved.format, OutputFormat::Latex);
        assert_eq!(config.numbering.policy, NumberingPolicy::PerSection);
        assert_eq!(config.html.title_template, "{name} {number}.");
        assert_eq!(config.latex.parent_counter.as_deref(), Some("section"));
    }

    #[test]
    fn test_default_kind_table() {
        let config = Config::default();
        let table = config.kind_table();
        assert_eq!(table.human_name(StatementKind::Theorem), Some("Theorem"));
        assert!(!table.is_numbered(StatementKind::Proof));
        assert!(table.is_numbered(StatementKind::Lemma));
    }

    #[test]
    fn test_kinds_names_replace_defaults() {
        let content = r#"
[kinds]
names = { theorem = "Satz", lemma = "Hilfssatz" }
"#;
        let config = Config::parse(content, Path::new(".")).unwrap();
        let table = config.kind_table();
        assert_eq!(table.human_name(StatementKind::Theorem), Some("Satz"));
        assert_eq!(table.human_name(StatementKind::Lemma), Some("Hilfssatz"));
        // Kinds dropped from a configured map have no display name.
        assert_eq!(table.human_name(StatementKind::Corollary), None);
    }

    #[test]
    fn test_kinds_unnumbered_replaces_default_set() {
        let content = r#"
[kinds]
unnumbered = ["example"]
"#;
        let config = Config::parse(content, Path::new(".")).unwrap();
        let table = config.kind_table();
        assert!(!table.is_numbered(StatementKind::Example));
        // Default entry no longer applies once the set is configured.
        assert!(table.is_numbered(StatementKind::Proof));
    }

    #[test]
    fn test_unknown_kind_name_is_not_an_error() {
        let content = r#"
[kinds]
names = { theorem = "Theorem", axiom = "Axiom" }
"#;
        let config = Config::parse(content, Path::new(".")).unwrap();
        let table = config.kind_table();
        assert_eq!(table.human_name(StatementKind::Theorem), Some("Theorem"));
    }

    #[test]
    fn test_empty_template_rejected() {
        let content = r#"
[html]
title_template = ""
"#;
        let err = Config::parse(content, Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_cli_settings_override() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            source_dir: Some(PathBuf::from("/elsewhere/docs")),
            output_dir: None,
            format: Some(OutputFormat::Latex),
        });
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/elsewhere/docs")
        );
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/build"));
        assert_eq!(config.docs_resolved.format, OutputFormat::Latex);
    }

    #[test]
    fn test_missing_explicit_config_is_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/thm.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}

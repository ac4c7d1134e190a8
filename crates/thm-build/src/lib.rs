//! Build driver for thm.
//!
//! Owns the two-phase build over a documentation tree:
//!
//! 1. [`BuildDriver::collect_all`] walks the source directory in sorted
//!    order (numbering is deterministic across runs), parses every
//!    document, and populates the registry.
//! 2. [`BuildDriver::render_all`] renders documents against the
//!    now-complete registry, in parallel, and writes one output file
//!    per document (plus `preamble.tex` for LaTeX).
//!
//! Statement-level problems (duplicate labels, dangling references,
//! unclosed blocks) are warnings and never abort a build; only I/O
//! failures are [`BuildError`]s.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use thm_config::{Config, NumberingPolicy as PolicyConfig, OutputFormat};
use thm_model::{KindTable, Statement};
use thm_registry::{Entry, NumberingPolicy, StatementRegistry};
use thm_renderer::{
    DocumentRenderer, HtmlBackend, LatexBackend, StatementBackend, StatementCollector,
};

/// Build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Failed to read or write a file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation failed on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Source directory walk failed.
    #[error("failed to walk source directory: {0}")]
    Walk(#[from] ignore::Error),
}

/// One source document held across the two phases.
#[derive(Debug)]
struct DocumentSource {
    /// Document id: source-relative path without the `.md` extension,
    /// `/`-separated.
    doc: String,
    source: String,
    statements: Vec<Statement>,
}

/// Summary of a finished phase.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of documents processed.
    pub documents: usize,
    /// Warnings gathered across documents, in document order.
    pub warnings: Vec<String>,
}

/// Two-phase build over a documentation tree.
///
/// The driver owns the registry; collection mutates it, rendering only
/// reads it. Holding collected sources between the phases keeps
/// rendering a pure function of (source, registry).
pub struct BuildDriver {
    config: Config,
    kinds: KindTable,
    registry: StatementRegistry,
    documents: Vec<DocumentSource>,
}

impl BuildDriver {
    /// Create a driver from loaded configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let kinds = config.kind_table();
        let policy = match config.numbering.policy {
            PolicyConfig::Global => NumberingPolicy::Global,
            PolicyConfig::PerSection => NumberingPolicy::PerSection,
        };
        Self {
            config,
            kinds,
            registry: StatementRegistry::with_policy(policy),
            documents: Vec::new(),
        }
    }

    /// The registry in its current state.
    #[must_use]
    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    /// Phase 1: parse every document under the source directory and
    /// populate the registry.
    ///
    /// Documents are visited in sorted path order so numbers are stable
    /// across runs. A missing source directory is an empty build, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on unreadable files or a failed walk.
    pub fn collect_all(&mut self) -> Result<BuildReport, BuildError> {
        let source_dir = self.config.docs_resolved.source_dir.clone();
        self.documents.clear();

        let mut report = BuildReport::default();
        for path in discover_documents(&source_dir)? {
            let doc = doc_id(&source_dir, &path);
            let source = fs::read_to_string(&path).map_err(|source| BuildError::Io {
                path: path.clone(),
                source,
            })?;

            let collected =
                StatementCollector::new(&self.kinds, &mut self.registry).collect(&doc, &source);
            for warning in &collected.warnings {
                tracing::warn!(doc = %doc, "{warning}");
            }
            report.warnings.extend(collected.warnings);
            report.documents += 1;
            self.documents.push(DocumentSource {
                doc,
                source,
                statements: collected.statements,
            });
        }

        Ok(report)
    }

    /// Phase 2: render every collected document and write the outputs.
    ///
    /// The registry is read-only here; documents render in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when an output file cannot be written.
    pub fn render_all(&self) -> Result<BuildReport, BuildError> {
        let output_dir = &self.config.docs_resolved.output_dir;
        match self.config.docs_resolved.format {
            OutputFormat::Html => {
                let backend = self.html_backend();
                self.render_with(&backend, output_dir)
            }
            OutputFormat::Latex => {
                let backend = self.latex_backend();
                let report = self.render_with(&backend, output_dir)?;
                let mut preamble = String::new();
                backend.preamble(&mut preamble);
                write_output(&output_dir.join("preamble.tex"), &preamble)?;
                Ok(report)
            }
        }
    }

    /// Render every collected document without writing anything.
    ///
    /// Used by check runs: rendering warnings are produced (collection
    /// warnings come from [`collect_all`](Self::collect_all)), no
    /// output tree is touched.
    #[must_use]
    pub fn check(&self) -> BuildReport {
        let warnings = match self.config.docs_resolved.format {
            OutputFormat::Html => self.render_documents(&self.html_backend()),
            OutputFormat::Latex => self.render_documents(&self.latex_backend()),
        }
        .into_iter()
        .flat_map(|(_, _, warnings)| warnings)
        .collect();
        BuildReport {
            documents: self.documents.len(),
            warnings,
        }
    }

    /// Drop one document's registry entries and re-collect it from disk.
    ///
    /// Other documents keep their entries and numbers; the re-collected
    /// statements get fresh numbers from the shared sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the source file cannot be read.
    pub fn invalidate(&mut self, doc: &str) -> Result<BuildReport, BuildError> {
        self.registry.clear(doc);
        self.documents.retain(|d| d.doc != doc);

        let path = self
            .config
            .docs_resolved
            .source_dir
            .join(format!("{doc}.md"));
        let source = fs::read_to_string(&path).map_err(|source| BuildError::Io {
            path: path.clone(),
            source,
        })?;

        let collected =
            StatementCollector::new(&self.kinds, &mut self.registry).collect(doc, &source);
        for warning in &collected.warnings {
            tracing::warn!(doc = %doc, "{warning}");
        }
        let report = BuildReport {
            documents: 1,
            warnings: collected.warnings,
        };
        self.documents.push(DocumentSource {
            doc: doc.to_owned(),
            source,
            statements: collected.statements,
        });
        Ok(report)
    }

    /// Import registry entries computed elsewhere, restricted to an
    /// allowed set of documents.
    pub fn merge_group<I>(&mut self, entries: I, allowed_docs: &HashSet<String>)
    where
        I: IntoIterator<Item = (String, Entry)>,
    {
        self.registry.merge(entries, allowed_docs);
    }

    fn html_backend(&self) -> HtmlBackend {
        HtmlBackend::new(self.kinds.clone())
            .with_title_template(self.config.html.title_template.clone())
            .with_reference_format(self.config.html.reference_format.clone())
    }

    fn latex_backend(&self) -> LatexBackend {
        let backend = LatexBackend::new(self.kinds.clone());
        match &self.config.latex.parent_counter {
            Some(counter) => backend.with_parent_counter(counter.clone()),
            None => backend,
        }
    }

    /// Render all documents with one backend; returns (doc, output,
    /// warnings) per document, in document order.
    fn render_documents<B: StatementBackend>(
        &self,
        backend: &B,
    ) -> Vec<(String, String, Vec<String>)> {
        let renderer = DocumentRenderer::new(backend, &self.registry);
        self.documents
            .par_iter()
            .map(|document| {
                let rendered =
                    renderer.render(&document.doc, &document.source, &document.statements);
                for warning in &rendered.warnings {
                    tracing::warn!(doc = %document.doc, "{warning}");
                }
                (rendered.doc, rendered.output, rendered.warnings)
            })
            .collect()
    }

    fn render_with<B: StatementBackend>(
        &self,
        backend: &B,
        output_dir: &Path,
    ) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        for (doc, output, warnings) in self.render_documents(backend) {
            let path = output_dir.join(format!("{doc}.{}", B::EXTENSION));
            write_output(&path, &output)?;
            report.documents += 1;
            report.warnings.extend(warnings);
        }
        Ok(report)
    }
}

/// Enumerate `*.md` files under a source directory, sorted by path.
fn discover_documents(source_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !source_dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let walk = WalkBuilder::new(source_dir)
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_name(std::ffi::OsStr::cmp)
        .build();
    for entry in walk {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file())
            && path.extension().is_some_and(|e| e == "md")
        {
            paths.push(path.to_path_buf());
        }
    }
    Ok(paths)
}

/// Document id for a source file: the source-relative path without the
/// `.md` extension, `/`-separated.
fn doc_id(source_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source_dir).unwrap_or(path);
    let without_ext = relative.with_extension("");
    without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write one output file, creating parent directories as needed.
fn write_output(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

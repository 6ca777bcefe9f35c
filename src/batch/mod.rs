//! Batch enrichment over a cook-book
//!
//! For every discovered recipe: read, parse, enrich, serialize, write back.
//! Documents run on a rayon pool. A document is written once, after all of
//! its versions have settled, and a failure in one document never stops the
//! others.
//!
//! ## Module Organization
//!
//! - `discovery.rs`: finding recipe files under the root
//! - `store.rs`: reading and atomically writing recipe documents
//! - `genrules.rs`: the read-only build-file scan

pub mod discovery;
pub mod genrules;
pub mod store;

pub use discovery::discover;
pub use store::{DocumentStore, FsStore};

use std::path::{Path, PathBuf};

use rayon::ThreadPool;
use rayon::prelude::*;
use serde_json::Value;

use crate::error::{CookbookError, Result};
use crate::recipe::RecipeEnricher;
use crate::ui::ProgressReporter;

/// Knobs for a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Skip writing; only report what would change
    pub dry_run: bool,
}

/// What happened to one document that was read and parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub enriched_fields: usize,
    pub degraded_versions: usize,
    pub written: bool,
}

/// Result for one discovered document
#[derive(Debug)]
pub struct DocumentReport {
    pub id: PathBuf,
    pub result: Result<DocumentSummary>,
}

impl DocumentReport {
    /// The one progress line reported for this document
    pub fn progress_line(&self) -> String {
        let id = self.id.display();
        match &self.result {
            Err(_) => format!("Skipping {id}... "),
            Ok(summary) if summary.written => format!("Writing {id}... "),
            Ok(summary) if summary.enriched_fields > 0 => format!(
                "Would write {id} ({} field{})",
                summary.enriched_fields,
                if summary.enriched_fields == 1 { "" } else { "s" }
            ),
            Ok(_) => format!("Unchanged {id}"),
        }
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents: usize,
    pub written: usize,
    pub changed: usize,
    /// Documents skipped because they could not be read, parsed or written
    pub failed: Vec<PathBuf>,
    pub enriched_fields: usize,
    pub degraded_versions: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[DocumentReport]) -> Self {
        let mut summary = Self {
            documents: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match &report.result {
                Ok(document) => {
                    summary.written += usize::from(document.written);
                    summary.changed += usize::from(document.enriched_fields > 0);
                    summary.enriched_fields += document.enriched_fields;
                    summary.degraded_versions += document.degraded_versions;
                }
                Err(_) => summary.failed.push(report.id.clone()),
            }
        }
        summary
    }
}

/// Runs recipe enrichment over a set of documents
pub struct BatchRunner<'a> {
    store: &'a dyn DocumentStore,
    recipes: RecipeEnricher<'a>,
    reporter: &'a dyn ProgressReporter,
    pool: &'a ThreadPool,
    options: BatchOptions,
}

impl<'a> BatchRunner<'a> {
    /// Process documents on `pool`, one document per worker
    pub fn new(
        store: &'a dyn DocumentStore,
        recipes: RecipeEnricher<'a>,
        reporter: &'a dyn ProgressReporter,
        pool: &'a ThreadPool,
        options: BatchOptions,
    ) -> Self {
        Self {
            store,
            recipes,
            reporter,
            pool,
            options,
        }
    }

    /// Process every document, returning one report per id in input order
    pub fn run(&self, ids: Vec<PathBuf>) -> Vec<DocumentReport> {
        self.reporter.start(ids.len());
        let reports = self.pool.install(|| {
            ids.into_par_iter()
                .map(|id| {
                    let result = self.process(&id);
                    if let Err(err) = &result {
                        tracing::warn!("{err}");
                    }
                    let report = DocumentReport { id, result };
                    self.reporter.document(&report.progress_line());
                    report
                })
                .collect()
        });
        self.reporter.finish();
        reports
    }

    fn process(&self, id: &Path) -> Result<DocumentSummary> {
        let raw = self.store.read(id)?;
        let document: Value =
            serde_json::from_str(&raw).map_err(|e| CookbookError::DocumentParseFailed {
                path: id.display().to_string(),
                reason: e.to_string(),
            })?;

        let outcome = self.recipes.enrich(document);
        for (version, pass, err) in outcome.failures() {
            tracing::warn!(
                recipe = %id.display(),
                version,
                field = pass.field(),
                "Skipping this field: {err}"
            );
        }

        let mut summary = DocumentSummary {
            enriched_fields: outcome.enriched_fields(),
            degraded_versions: outcome.degraded_versions(),
            written: false,
        };
        if self.options.dry_run {
            return Ok(summary);
        }

        let content = to_document_text(&outcome.document).map_err(|e| {
            CookbookError::DocumentWriteFailed {
                path: id.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        self.store.write(id, &content)?;
        summary.written = true;
        Ok(summary)
    }
}

/// Serialize a recipe the way cook-books store them: two-space indent, no trailing newline
pub fn to_document_text(document: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

//! Recipe enrichment
//!
//! A recipe document is a JSON object whose `versions` maps version strings
//! to version records. Enrichment rewrites the records in place, keeping the
//! version key order and every other field of the document as it was.
//!
//! ## Module Organization
//!
//! - `outcome.rs`: enrichment passes and per-version step outcomes
//! - `version.rs`: VersionEnricher, the per-version orchestrator

pub mod outcome;
pub mod version;

pub use outcome::{Pass, Passes, VersionReport};
pub use version::VersionEnricher;

use rayon::ThreadPool;
use rayon::prelude::*;
use serde_json::Value;

use crate::error::CookbookError;

pub const VERSIONS: &str = "versions";

/// Enriches every version of a recipe document independently
pub struct RecipeEnricher<'a> {
    versions: VersionEnricher<'a>,
    pool: &'a ThreadPool,
}

/// An enriched document with a report per version, in document order
#[derive(Debug, Clone)]
pub struct RecipeOutcome {
    pub document: Value,
    pub versions: Vec<VersionReport>,
}

impl RecipeOutcome {
    /// Whether any field was written
    pub fn changed(&self) -> bool {
        self.enriched_fields() > 0
    }

    pub fn enriched_fields(&self) -> usize {
        self.versions.iter().map(|v| v.enriched().count()).sum()
    }

    pub fn degraded_versions(&self) -> usize {
        self.versions.iter().filter(|v| v.is_degraded()).count()
    }

    /// Every failed step as (version key, pass, error)
    pub fn failures(&self) -> impl Iterator<Item = (&str, Pass, &CookbookError)> {
        self.versions.iter().flat_map(|v| {
            v.failures()
                .map(move |(pass, err)| (v.key.as_str(), pass, err))
        })
    }
}

impl<'a> RecipeEnricher<'a> {
    /// Enrich the versions of a document on `pool`
    pub fn new(versions: VersionEnricher<'a>, pool: &'a ThreadPool) -> Self {
        Self { versions, pool }
    }

    /// Enrich a parsed recipe document
    ///
    /// Documents without a `versions` object are returned untouched.
    pub fn enrich(&self, mut document: Value) -> RecipeOutcome {
        let Some(Value::Object(versions)) = document.get_mut(VERSIONS) else {
            return RecipeOutcome {
                document,
                versions: Vec::new(),
            };
        };

        let entries: Vec<(String, Value)> = std::mem::take(versions).into_iter().collect();
        let enriched: Vec<(Value, VersionReport)> = self.pool.install(|| {
            entries
                .into_par_iter()
                .map(|(key, version)| self.versions.enrich(version).into_report(key))
                .collect()
        });

        let mut reports = Vec::with_capacity(enriched.len());
        for (version, report) in enriched {
            versions.insert(report.key.clone(), version);
            reports.push(report);
        }

        RecipeOutcome {
            document,
            versions: reports,
        }
    }
}

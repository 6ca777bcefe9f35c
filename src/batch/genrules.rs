//! Read-only build-file scan
//!
//! For each recipe, fetches the Buck file referenced by its first version and
//! checks it for a marker (by default `genrule`). Nothing is written.

use std::path::{Path, PathBuf};

use rayon::ThreadPool;
use rayon::prelude::*;
use serde_json::Value;

use super::store::DocumentStore;
use crate::error::{CookbookError, Result};
use crate::fetch::FetchCache;
use crate::recipe::VERSIONS;
use crate::recipe::version::BUCK;
use crate::source::source_ref::URL;

pub const DEFAULT_MARKER: &str = "genrule";

/// A recipe whose build file contains the marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenruleMatch {
    pub id: PathBuf,
    pub build_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderReport {
    /// Documents read and parsed
    pub scanned: usize,
    /// Matches in discovery order
    pub matches: Vec<GenruleMatch>,
    /// Documents that could not be read or parsed
    pub skipped: usize,
}

pub struct GenruleFinder<'a> {
    store: &'a dyn DocumentStore,
    cache: &'a FetchCache,
    marker: &'a str,
    pool: &'a ThreadPool,
}

impl<'a> GenruleFinder<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        cache: &'a FetchCache,
        marker: &'a str,
        pool: &'a ThreadPool,
    ) -> Self {
        Self {
            store,
            cache,
            marker,
            pool,
        }
    }

    pub fn scan(&self, ids: Vec<PathBuf>) -> FinderReport {
        let results: Vec<(PathBuf, Result<Option<String>>)> = self.pool.install(|| {
            ids.into_par_iter()
                .map(|id| {
                    let result = self.check(&id);
                    (id, result)
                })
                .collect()
        });

        let mut report = FinderReport::default();
        for (id, result) in results {
            match result {
                Ok(Some(build_file)) => {
                    report.scanned += 1;
                    report.matches.push(GenruleMatch { id, build_file });
                }
                Ok(None) => report.scanned += 1,
                Err(err) => {
                    tracing::warn!("{err}");
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// The build file of `id` if it contains the marker
    fn check(&self, id: &Path) -> Result<Option<String>> {
        let raw = self.store.read(id)?;
        let document: Value =
            serde_json::from_str(&raw).map_err(|e| CookbookError::DocumentParseFailed {
                path: id.display().to_string(),
                reason: e.to_string(),
            })?;

        let Some(url) = first_build_file_url(&document) else {
            return Ok(None);
        };

        match self.cache.fetch_text(url) {
            Ok(build_file) if build_file.contains(self.marker) => Ok(Some(build_file)),
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!(recipe = %id.display(), "Treating as no match: {err}");
                Ok(None)
            }
        }
    }
}

/// `buck.url` of the first version in document order
fn first_build_file_url(document: &Value) -> Option<&str> {
    document
        .get(VERSIONS)?
        .as_object()?
        .values()
        .next()?
        .get(BUCK)?
        .get(URL)?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::super::store::memory::MemoryStore;
    use super::*;
    use crate::common::sync::worker_pool;
    use crate::fetch::fake::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    const GENRULE_BUCK: &str = "https://example.com/buck/openssl/BUCK";
    const PLAIN_BUCK: &str = "https://example.com/buck/zlib/BUCK";
    const OLD_BUCK: &str = "https://example.com/buck/zlib-old/BUCK";

    fn recipe(first: &str, second: &str) -> String {
        json!({
            "versions": {
                "2.0.0": { "buck": { "url": first } },
                "1.0.0": { "buck": { "url": second } }
            }
        })
        .to_string()
    }

    fn transport() -> Arc<FakeTransport> {
        Arc::new(
            FakeTransport::new()
                .with(GENRULE_BUCK, "genrule(name = 'configure')")
                .with(PLAIN_BUCK, "cxx_library(name = 'zlib')")
                .with(OLD_BUCK, "genrule(name = 'old')"),
        )
    }

    #[test]
    fn test_finds_marker_in_first_version_only() {
        let transport = transport();
        let cache = FetchCache::new(Box::new(Arc::clone(&transport)), 2);
        let store = MemoryStore::new()
            .with("recipes/openssl/openssl.json", &recipe(GENRULE_BUCK, PLAIN_BUCK))
            .with("recipes/zlib/zlib.json", &recipe(PLAIN_BUCK, OLD_BUCK));

        let pool = worker_pool(2).unwrap();
        let report = GenruleFinder::new(&store, &cache, DEFAULT_MARKER, &pool).scan(store.ids());

        assert_eq!(report.scanned, 2);
        assert_eq!(
            report.matches,
            vec![GenruleMatch {
                id: PathBuf::from("recipes/openssl/openssl.json"),
                build_file: "genrule(name = 'configure')".to_string(),
            }]
        );
        assert_eq!(transport.calls(OLD_BUCK), 0);
    }

    #[test]
    fn test_scan_writes_nothing() {
        let transport = transport();
        let cache = FetchCache::new(Box::new(Arc::clone(&transport)), 2);
        let store = MemoryStore::new().with(
            "recipes/openssl/openssl.json",
            &recipe(GENRULE_BUCK, PLAIN_BUCK),
        );

        let pool = worker_pool(1).unwrap();
        GenruleFinder::new(&store, &cache, DEFAULT_MARKER, &pool).scan(store.ids());

        assert_eq!(store.writes("recipes/openssl/openssl.json"), 0);
    }

    #[test]
    fn test_fetch_failure_counts_as_no_match() {
        let transport = Arc::new(FakeTransport::new().failing(GENRULE_BUCK, 1));
        let cache = FetchCache::new(Box::new(Arc::clone(&transport)), 2);
        let store = MemoryStore::new().with(
            "recipes/openssl/openssl.json",
            &recipe(GENRULE_BUCK, PLAIN_BUCK),
        );

        let pool = worker_pool(1).unwrap();
        let report = GenruleFinder::new(&store, &cache, DEFAULT_MARKER, &pool).scan(store.ids());

        assert_eq!(report.scanned, 1);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_unparseable_and_buckless_recipes() {
        let transport = transport();
        let cache = FetchCache::new(Box::new(Arc::clone(&transport)), 2);
        let store = MemoryStore::new()
            .with("recipes/bad/bad.json", "{")
            .with("recipes/nobuck/nobuck.json", r#"{"versions": {"1": {}}}"#)
            .with("recipes/noversions/noversions.json", "{}");

        let pool = worker_pool(2).unwrap();
        let report = GenruleFinder::new(&store, &cache, DEFAULT_MARKER, &pool).scan(store.ids());

        assert_eq!(report.skipped, 1);
        assert_eq!(report.scanned, 2);
        assert!(report.matches.is_empty());
        assert_eq!(transport.total_calls(), 0);
    }

    #[test]
    fn test_custom_marker() {
        let transport = transport();
        let cache = FetchCache::new(Box::new(Arc::clone(&transport)), 2);
        let store = MemoryStore::new().with("recipes/zlib/zlib.json", &recipe(PLAIN_BUCK, OLD_BUCK));

        let pool = worker_pool(1).unwrap();
        let report = GenruleFinder::new(&store, &cache, "cxx_library", &pool).scan(store.ids());

        assert_eq!(report.matches.len(), 1);
    }
}

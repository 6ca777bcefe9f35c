//! Per-run fetch cache
//!
//! Recipes routinely point many versions at the same archive or build file.
//! The cache guarantees one transport call and one hash computation per URL
//! for the lifetime of a [`FetchCache`], which is created once per batch run
//! and passed down explicitly.
//!
//! Each URL owns a slot. The first caller to reach an empty slot fetches while
//! holding the slot lock; concurrent callers for the same URL wait on it and
//! then reuse the stored hash. A failed fetch leaves the slot empty, so the
//! next caller retries instead of inheriting the failure.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::Transport;
use crate::common::sync::{Permits, lock};
use crate::error::Result;
use crate::hash;

/// How a resource is decoded before hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Decoded as UTF-8 and hashed as text (build files)
    Text,
    /// Hashed as raw bytes (source archives)
    Bytes,
}

type Slot = Arc<Mutex<Option<String>>>;

/// Counters reported in the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Transport calls made through the cache
    pub fetches: usize,
    /// Lookups answered from a memoized hash
    pub hits: usize,
}

/// Memoizes content hashes by (payload kind, URL)
pub struct FetchCache {
    transport: Box<dyn Transport>,
    permits: Permits,
    slots: Mutex<HashMap<(PayloadKind, String), Slot>>,
    fetches: AtomicUsize,
    hits: AtomicUsize,
}

impl FetchCache {
    /// Wrap a transport, allowing at most `fetch_limit` requests in flight
    pub fn new(transport: Box<dyn Transport>, fetch_limit: usize) -> Self {
        Self {
            transport,
            permits: Permits::new(fetch_limit),
            slots: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
        }
    }

    /// SHA-256 of the raw bytes at `url`
    pub fn bytes_hash(&self, url: &str) -> Result<String> {
        self.memoized(PayloadKind::Bytes, url, || {
            let bytes = self.transport.get_bytes(url)?;
            Ok(hash::digest_bytes(&bytes))
        })
    }

    /// SHA-256 of the UTF-8 text at `url`
    pub fn text_hash(&self, url: &str) -> Result<String> {
        self.memoized(PayloadKind::Text, url, || {
            let text = self.transport.get_text(url)?;
            Ok(hash::digest_text(&text))
        })
    }

    /// Fetch text without memoizing it, still bounded by the fetch limit
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let _permit = self.permits.acquire();
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.transport.get_text(url)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches: self.fetches.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }

    fn slot(&self, kind: PayloadKind, url: &str) -> Slot {
        let mut slots = lock(&self.slots);
        Arc::clone(slots.entry((kind, url.to_string())).or_default())
    }

    fn memoized(
        &self,
        kind: PayloadKind,
        url: &str,
        compute: impl FnOnce() -> Result<String>,
    ) -> Result<String> {
        let slot = self.slot(kind, url);
        let mut entry = lock(&slot);
        if let Some(hash) = entry.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(url, "cache hit");
            return Ok(hash.clone());
        }

        let hash = {
            let _permit = self.permits.acquire();
            self.fetches.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(url, ?kind, "downloading");
            compute()?
        };
        tracing::debug!(url, sha256 = %hash, "hashed");
        *entry = Some(hash.clone());
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CookbookError;
    use crate::fetch::fake::FakeTransport;
    use std::thread;
    use std::time::Duration;

    const ZIP: &str = "https://github.com/acme/widget/archive/abc123.zip";
    const BUCK: &str = "https://example.com/buck/widget/BUCK";

    fn cache_with(transport: &Arc<FakeTransport>, limit: usize) -> FetchCache {
        FetchCache::new(Box::new(Arc::clone(transport)), limit)
    }

    #[test]
    fn test_same_url_fetched_once() {
        let transport = Arc::new(FakeTransport::new().with(ZIP, b"zip-bytes".to_vec()));
        let cache = cache_with(&transport, 4);

        let first = cache.bytes_hash(ZIP).unwrap();
        let second = cache.bytes_hash(ZIP).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, hash::digest_bytes(b"zip-bytes"));
        assert_eq!(transport.calls(ZIP), 1);
        assert_eq!(cache.stats(), CacheStats { fetches: 1, hits: 1 });
    }

    #[test]
    fn test_concurrent_requests_share_one_fetch() {
        let transport = Arc::new(
            FakeTransport::new()
                .with(ZIP, b"zip-bytes".to_vec())
                .with_delay(Duration::from_millis(20)),
        );
        let cache = cache_with(&transport, 8);

        let hashes: Vec<String> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.bytes_hash(ZIP).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(transport.calls(ZIP), 1);
        assert!(hashes.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_failure_is_not_memoized() {
        let transport = Arc::new(
            FakeTransport::new()
                .with(ZIP, b"zip-bytes".to_vec())
                .failing(ZIP, 1),
        );
        let cache = cache_with(&transport, 1);

        let first = cache.bytes_hash(ZIP);
        assert!(matches!(first, Err(CookbookError::FetchFailed { .. })));

        let second = cache.bytes_hash(ZIP).unwrap();
        assert_eq!(second, hash::digest_bytes(b"zip-bytes"));
        assert_eq!(transport.calls(ZIP), 2);
    }

    #[test]
    fn test_text_and_bytes_cached_separately() {
        let transport = Arc::new(FakeTransport::new().with(BUCK, "cxx_library()"));
        let cache = cache_with(&transport, 1);

        let text = cache.text_hash(BUCK).unwrap();
        let bytes = cache.bytes_hash(BUCK).unwrap();

        assert_eq!(text, bytes);
        assert_eq!(transport.calls(BUCK), 2);
    }

    #[test]
    fn test_fetch_text_is_not_cached() {
        let transport = Arc::new(FakeTransport::new().with(BUCK, "genrule()"));
        let cache = cache_with(&transport, 1);

        assert_eq!(cache.fetch_text(BUCK).unwrap(), "genrule()");
        assert_eq!(cache.fetch_text(BUCK).unwrap(), "genrule()");
        assert_eq!(transport.calls(BUCK), 2);
        assert_eq!(cache.stats().fetches, 2);
    }

    #[test]
    fn test_caches_are_independent() {
        let transport = Arc::new(FakeTransport::new().with(ZIP, b"zip-bytes".to_vec()));
        let first_run = cache_with(&transport, 1);
        let second_run = cache_with(&transport, 1);

        first_run.bytes_hash(ZIP).unwrap();
        second_run.bytes_hash(ZIP).unwrap();

        assert_eq!(transport.calls(ZIP), 2);
    }

    /// Tracks how many downloads are in flight at once
    #[derive(Default)]
    struct GaugeTransport {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Transport for GaugeTransport {
        fn get_text(&self, url: &str) -> Result<String> {
            Ok(String::from_utf8_lossy(&self.get_bytes(url)?).into_owned())
        }

        fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(url.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_fetch_limit_bounds_distinct_downloads() {
        let transport = Arc::new(GaugeTransport::default());
        let cache = FetchCache::new(Box::new(Arc::clone(&transport)), 2);
        let urls: Vec<String> = (0..10)
            .map(|n| format!("https://github.com/acme/widget/archive/v{n}.zip"))
            .collect();

        thread::scope(|scope| {
            for url in &urls {
                let cache = &cache;
                scope.spawn(move || cache.bytes_hash(url).unwrap());
            }
        });

        let peak = transport.peak.load(Ordering::SeqCst);
        assert!(peak <= 2, "{peak} downloads overlapped");
        assert!(peak >= 1);
        assert_eq!(cache.stats().fetches, 10);
    }
}

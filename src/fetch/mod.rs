//! Remote resource retrieval
//!
//! - [`Transport`]: a single GET of a URL, as text or bytes
//! - [`http::HttpTransport`]: the `ureq` implementation used by the CLI
//! - [`cache::FetchCache`]: per-run memoization of content hashes by URL

pub mod cache;
pub mod http;

pub use cache::FetchCache;
pub use http::HttpTransport;

use crate::error::Result;

/// Fetches a resource by absolute URL
///
/// Implementations perform exactly one request per call and never retry.
/// Transport failures, non-success statuses and timeouts are all reported as
/// [`crate::error::CookbookError::FetchFailed`].
pub trait Transport: Send + Sync {
    /// Fetch a resource and decode it as UTF-8 text
    fn get_text(&self, url: &str) -> Result<String>;

    /// Fetch a resource as raw bytes
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

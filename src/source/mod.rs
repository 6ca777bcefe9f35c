//! Recipe source references
//!
//! A version's `source` comes in three shapes:
//! - structured: `{"url": "...", "subPath": "...", "sha256": "..."}`
//! - bare GitHub archive URL: `"https://github.com/acme/widget/archive/abc123.zip"`
//! - bare GitHub remote: `"git@github.com:acme/widget.git#abc123"`
//!
//! ## Module Organization
//!
//! - `source_ref.rs`: SourceRef classification and the structured form
//! - `github.rs`: GitHub URL grammar (sub-paths, archive URLs, remotes)

pub mod github;
pub mod source_ref;

pub use source_ref::SourceRef;

//! Error types and handling for cookbook
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors fall into three scopes:
//! - version scope ([`CookbookError::FetchFailed`], [`CookbookError::MalformedGitRemote`]):
//!   the affected field is left unchanged and the run continues
//! - document scope (read, parse and write failures): the document is skipped
//! - run scope (discovery, pattern, configuration and worker pool failures): the run aborts

pub mod fetch;
pub mod source;

pub use fetch::failed as fetch_failed;
pub use source::malformed_git_remote;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for cookbook operations
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CookbookError {
    // Version-scoped errors
    #[error("Failed to fetch {url}: {reason}")]
    #[diagnostic(
        code(cookbook::fetch::failed),
        help("Check that the URL is reachable; the field is retried on the next run")
    )]
    FetchFailed { url: String, reason: String },

    #[error("Malformed git remote '{input}': {reason}")]
    #[diagnostic(
        code(cookbook::source::malformed_git_remote),
        help("Expected the form git@github.com:<owner>/<project>.git#<commit>")
    )]
    MalformedGitRemote { input: String, reason: String },

    // Document-scoped errors
    #[error("Failed to read recipe: {path}: {reason}")]
    #[diagnostic(code(cookbook::document::read_failed))]
    DocumentReadFailed { path: String, reason: String },

    #[error("Failed to parse recipe: {path}: {reason}")]
    #[diagnostic(
        code(cookbook::document::parse_failed),
        help("The recipe must be valid JSON; it is skipped for this run")
    )]
    DocumentParseFailed { path: String, reason: String },

    #[error("Failed to write recipe: {path}: {reason}")]
    #[diagnostic(code(cookbook::document::write_failed))]
    DocumentWriteFailed { path: String, reason: String },

    // Run-scoped errors
    #[error("Failed to discover recipes under {root}: {reason}")]
    #[diagnostic(
        code(cookbook::discovery::failed),
        help("Run from the root of a cook-book folder, adjacent to \"recipes\", or pass --root")
    )]
    DiscoveryFailed { root: String, reason: String },

    #[error("Invalid recipe pattern '{pattern}': {reason}")]
    #[diagnostic(code(cookbook::discovery::invalid_pattern))]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(cookbook::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(cookbook::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to start worker threads: {reason}")]
    #[diagnostic(code(cookbook::runtime::worker_pool))]
    WorkerPoolFailed { reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(cookbook::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for CookbookError {
    fn from(err: std::io::Error) -> Self {
        CookbookError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CookbookError {
    fn from(err: serde_json::Error) -> Self {
        CookbookError::DocumentParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CookbookError>;

#[cfg(test)]
mod tests;

//! Source reference shapes
//!
//! A version's `source` is either a structured object or one of two bare
//! string forms left over from older recipes. Classification happens up front
//! so every enrichment step can match exhaustively on the shape.

use serde_json::{Map, Value};

use super::github;
use crate::error::Result;

/// Field names as they appear in recipe documents
pub const URL: &str = "url";
pub const SUB_PATH: &str = "subPath";
pub const SHA256: &str = "sha256";

/// The structured `{url, subPath?, sha256?}` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredSource {
    pub url: String,
    pub sub_path: Option<String>,
    pub sha256: Option<String>,
}

impl StructuredSource {
    /// Read the structured form from a JSON object, if it has a string `url`
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let url = map.get(URL)?.as_str()?.to_string();
        Some(Self {
            url,
            sub_path: present_field(map, SUB_PATH),
            sha256: present_field(map, SHA256),
        })
    }

    /// `<project>-<commit>` for a GitHub archive without a recorded sub-path
    pub fn derive_sub_path(&self) -> Option<String> {
        if self.sub_path.is_some() {
            return None;
        }
        github::sub_path_from_url(&self.url)
    }
}

/// Classified `source` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// Already an object with a `url`
    Structured(StructuredSource),
    /// A bare `https://github.com/...` archive URL string
    BareZipUrl(String),
    /// A bare `git@github.com:...` remote string
    BareGitRemote(String),
    /// Anything else: passed through untouched
    Unrecognized,
}

impl SourceRef {
    /// Classify a `source` value by shape
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Object(map) => StructuredSource::from_map(map)
                .map_or(SourceRef::Unrecognized, SourceRef::Structured),
            Value::String(s) if github::is_github_url(s) => SourceRef::BareZipUrl(s.clone()),
            Value::String(s) if github::is_git_remote(s) => SourceRef::BareGitRemote(s.clone()),
            _ => SourceRef::Unrecognized,
        }
    }

    /// Normalize a bare git remote into the structured `{url}` form
    ///
    /// Other shapes are returned as they are. Structured sources are never
    /// re-derived, so applying this twice is a no-op.
    pub fn resolve_git_remote(self) -> Result<Self> {
        match self {
            SourceRef::BareGitRemote(remote) => {
                let url = github::zip_url_from_git_remote(&remote)?;
                Ok(SourceRef::Structured(StructuredSource {
                    url,
                    sub_path: None,
                    sha256: None,
                }))
            }
            other => Ok(other),
        }
    }
}

/// A field counts as present unless it is absent or `null`
///
/// Non-string values are kept as their JSON text so they are never overwritten.
pub fn present_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

//! `cookbook.yaml` data structures
//!
//! The file is optional and every key in it is optional. Unknown keys are
//! rejected so a typo does not silently fall back to a default.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CookbookError, Result};

/// Name of the configuration file at the cook-book root
pub const CONFIG_FILE: &str = "cookbook.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Recipe glob, relative to the root
    pub pattern: Option<String>,

    /// Documents processed at once
    pub jobs: Option<usize>,

    /// Maximum outstanding downloads
    pub fetch_limit: Option<usize>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Largest accepted response body
    pub max_download_bytes: Option<u64>,

    /// Substring searched for by `genrules`
    pub marker: Option<String>,
}

impl FileConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self> {
        // An empty file deserializes as a null document
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| CookbookError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load `cookbook.yaml` from `root`, if there is one
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&path).map_err(|e| CookbookError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_yaml(&yaml, &path).map(Some)
    }
}

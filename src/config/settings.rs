//! Effective run settings
//!
//! Precedence, highest first: command-line flag or its environment variable
//! (both handled by clap), `cookbook.yaml`, built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::file::FileConfig;
use crate::batch::discovery::DEFAULT_PATTERN;
use crate::batch::genrules::DEFAULT_MARKER;
use crate::error::Result;

pub const DEFAULT_JOBS: usize = 8;
pub const DEFAULT_FETCH_LIMIT: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub pattern: Option<String>,
    pub jobs: Option<usize>,
    pub fetch_limit: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub pattern: String,
    pub jobs: usize,
    pub fetch_limit: usize,
    pub timeout: Duration,
    pub max_download_bytes: u64,
    pub marker: String,
}

impl Settings {
    /// Merge overrides, `cookbook.yaml` under `root` and defaults
    pub fn resolve(root: &Path, overrides: Overrides) -> Result<Self> {
        let file = FileConfig::load(root)?.unwrap_or_default();
        Ok(Self::merge(root, overrides, file))
    }

    fn merge(root: &Path, overrides: Overrides, file: FileConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            pattern: overrides
                .pattern
                .or(file.pattern)
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            jobs: overrides
                .jobs
                .or(file.jobs)
                .unwrap_or(DEFAULT_JOBS)
                .max(1),
            fetch_limit: overrides
                .fetch_limit
                .or(file.fetch_limit)
                .unwrap_or(DEFAULT_FETCH_LIMIT)
                .max(1),
            timeout: Duration::from_secs(
                overrides
                    .timeout_secs
                    .or(file.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            max_download_bytes: file
                .max_download_bytes
                .unwrap_or(DEFAULT_MAX_DOWNLOAD_BYTES),
            marker: overrides
                .marker
                .or(file.marker)
                .unwrap_or_else(|| DEFAULT_MARKER.to_string()),
        }
    }
}

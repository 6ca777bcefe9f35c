//! Recipe discovery
//!
//! Walks the cook-book root and keeps files whose root-relative path matches
//! the recipe glob (by default `recipes/*/*.json`).

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{CookbookError, Result};

/// Default location of recipe documents relative to the cook-book root
pub const DEFAULT_PATTERN: &str = "recipes/*/*.json";

/// Find recipe documents under `root`, sorted by path
///
/// Returned paths are relative to `root`. Unreadable subdirectories are
/// skipped with a warning; an unreadable root is an error.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob = Glob::new(pattern).map_err(|e| CookbookError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    if !root.is_dir() {
        return Err(CookbookError::DiscoveryFailed {
            root: root.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(CookbookError::DiscoveryFailed {
                    root: root.display().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable path: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matches_glob(&glob, relative) {
            found.push(relative.to_path_buf());
        }
    }

    tracing::debug!(count = found.len(), pattern, "discovered recipes");
    Ok(found)
}

/// Match a relative path against the glob using forward slashes on every platform
fn matches_glob(glob: &Glob<'_>, relative: &Path) -> bool {
    let normalized = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    glob.matched(&CandidatePath::from(normalized.as_str())).is_some()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

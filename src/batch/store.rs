//! Recipe document storage

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{CookbookError, Result};

/// Reads and writes recipe documents by root-relative path
pub trait DocumentStore: Send + Sync {
    fn read(&self, id: &Path) -> Result<String>;

    /// Replace the whole document; never leaves a partial write behind
    fn write(&self, id: &Path, content: &str) -> Result<()>;
}

/// Documents stored as files under a cook-book root
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentStore for FsStore {
    fn read(&self, id: &Path) -> Result<String> {
        fs::read_to_string(self.root.join(id)).map_err(|e| CookbookError::DocumentReadFailed {
            path: id.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write(&self, id: &Path, content: &str) -> Result<()> {
        let path = self.root.join(id);
        let write_failed = |reason: String| CookbookError::DocumentWriteFailed {
            path: id.display().to_string(),
            reason,
        };

        let dir = path.parent().unwrap_or(self.root.as_path());
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| write_failed(e.to_string()))?;

        // Temp files are created owner-only; keep the recipe's own mode
        if let Ok(metadata) = fs::metadata(&path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| write_failed(e.to_string()))?;
        }

        temp.persist(&path)
            .map_err(|e| write_failed(e.error.to_string()))?;
        Ok(())
    }
}

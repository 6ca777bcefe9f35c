//! Command implementations for the cookbook CLI

pub mod completions;
pub mod enrich;
pub mod genrules;
pub mod version;

use std::path::PathBuf;

use crate::error::Result;

/// The cook-book root: `--root` if given, else the current directory
fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

//! Run configuration
//!
//! This module contains:
//! - `cookbook.yaml` - optional per-cook-book defaults
//! - [`Settings`] - the effective values after applying CLI and env overrides

pub mod file;
pub mod settings;

pub use settings::{Overrides, Settings};

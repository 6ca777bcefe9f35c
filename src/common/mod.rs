//! Helpers shared across modules

pub mod sync;

//! UI/Progress presentation layer
//!
//! This module handles:
//! - Per-document progress lines while a batch runs
//! - An indicatif progress bar beneath those lines
//! - Silent progress for `--quiet`
//!
//! All progress reporting goes through the ProgressReporter trait. Reporters
//! are shared by the batch worker threads, so every method takes `&self`.

pub mod summary;

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::common::sync::lock;

/// Progress reporter trait for batch runs
pub trait ProgressReporter: Send + Sync {
    /// Begin a run over `total` documents
    fn start(&self, total: usize);

    /// Report one finished document with a human-readable line
    fn document(&self, line: &str);

    /// Finish the run
    fn finish(&self);
}

/// Interactive progress reporter with a visual progress bar
///
/// Progress lines are printed above the bar. When stderr is not a terminal the
/// bar is hidden and only the lines are printed.
pub struct InteractiveProgressReporter {
    bar: ProgressBar,
    /// Serializes line output between workers
    output: Mutex<()>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} recipes")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(0);
        bar.set_style(style);

        Self {
            bar,
            output: Mutex::new(()),
        }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn document(&self, line: &str) {
        let _guard = lock(&self.output);
        self.bar.suspend(|| println!("{line}"));
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Silent progress reporter for quiet mode
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&self, _total: usize) {
        // No-op for silent mode
    }

    fn document(&self, _line: &str) {
        // No-op for silent mode
    }

    fn finish(&self) {
        // No-op for silent mode
    }
}

/// Pick the reporter for the current output mode
pub fn reporter(quiet: bool) -> Box<dyn ProgressReporter> {
    if quiet {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new())
    }
}

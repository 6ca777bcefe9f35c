//! Genrules command implementation

use std::path::PathBuf;

use crate::batch::genrules::GenruleFinder;
use crate::batch::{FsStore, discover};
use crate::cli::GenrulesArgs;
use crate::common::sync::worker_pool;
use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::fetch::{FetchCache, HttpTransport};
use crate::ui::summary;

/// Run genrules command
pub fn run(root: Option<PathBuf>, args: GenrulesArgs) -> Result<()> {
    let root = super::resolve_root(root)?;
    let settings = Settings::resolve(
        &root,
        Overrides {
            pattern: args.pattern,
            jobs: args.jobs,
            marker: args.marker,
            ..Overrides::default()
        },
    )?;

    let ids = discover(&settings.root, &settings.pattern)?;
    let transport = HttpTransport::new(settings.timeout, settings.max_download_bytes);
    let cache = FetchCache::new(Box::new(transport), settings.fetch_limit);
    let store = FsStore::new(&settings.root);
    let pool = worker_pool(settings.jobs)?;

    let report = GenruleFinder::new(&store, &cache, &settings.marker, &pool).scan(ids);
    tracing::info!(
        scanned = report.scanned,
        skipped = report.skipped,
        matches = report.matches.len(),
        "scan finished"
    );
    summary::print_finder_report(&report, &settings.marker);

    Ok(())
}

//! Enrich command implementation

use std::path::PathBuf;

use crate::batch::{BatchOptions, BatchRunner, BatchSummary, FsStore, discover};
use crate::cli::EnrichArgs;
use crate::common::sync::worker_pool;
use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::fetch::{FetchCache, HttpTransport};
use crate::recipe::{Passes, RecipeEnricher, VersionEnricher};
use crate::ui::{self, summary};

/// Run enrich command
pub fn run(root: Option<PathBuf>, quiet: bool, args: EnrichArgs) -> Result<()> {
    let root = super::resolve_root(root)?;
    let settings = Settings::resolve(
        &root,
        Overrides {
            pattern: args.pattern,
            jobs: args.jobs,
            fetch_limit: args.fetch_limit,
            timeout_secs: args.timeout,
            marker: None,
        },
    )?;

    let ids = discover(&settings.root, &settings.pattern)?;
    tracing::info!(
        recipes = ids.len(),
        root = %settings.root.display(),
        "enriching recipes"
    );

    let transport = HttpTransport::new(settings.timeout, settings.max_download_bytes);
    let cache = FetchCache::new(Box::new(transport), settings.fetch_limit);
    let document_pool = worker_pool(settings.jobs)?;
    let version_pool = worker_pool(settings.fetch_limit)?;
    let passes = Passes::from_selection(&args.passes);
    let recipes = RecipeEnricher::new(VersionEnricher::new(&cache, passes), &version_pool);
    let store = FsStore::new(&settings.root);
    let reporter = ui::reporter(quiet);

    let runner = BatchRunner::new(
        &store,
        recipes,
        reporter.as_ref(),
        &document_pool,
        BatchOptions {
            dry_run: args.dry_run,
        },
    );
    let reports = runner.run(ids);

    let totals = BatchSummary::from_reports(&reports);
    tracing::info!(
        written = totals.written,
        failed = totals.failed.len(),
        "enrichment finished"
    );
    summary::print_enrich_summary(&totals, cache.stats(), args.dry_run);

    Ok(())
}

//! Cookbook - recipe metadata enrichment
//!
//! Fills in derivable metadata of cook-book build recipes (archive sub-paths,
//! archive URLs for git remotes, SHA-256 hashes of sources and Buck files)
//! without ever changing a field that is already set.

use clap::Parser;

mod batch;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod fetch;
mod hash;
mod recipe;
mod source;
mod ui;

use cli::{Cli, Commands};

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Enrich(args) => commands::enrich::run(cli.root, cli.quiet, args),
        Commands::Genrules(args) => commands::genrules::run(cli.root, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

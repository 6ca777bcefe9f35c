//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::recipe::Pass;

/// Cookbook - recipe metadata enrichment
///
/// Fills in derivable metadata of cook-book recipes: archive sub-paths,
/// GitHub archive URLs for git remotes, and SHA-256 hashes of sources and
/// Buck files.
#[derive(Parser, Debug)]
#[command(
    name = "cookbook",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Metadata enrichment for cook-book build recipes",
    long_about = "Cookbook walks the recipes of a cook-book and fills in the fields that can be \
                  derived from what is already there: subPath for GitHub archives, archive URLs \
                  for git@github.com remotes, and sha256 for source archives and Buck files. \
                  Fields that are already present are never changed.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  cookbook enrich\n    \
                  cookbook enrich --pass source-hash --pass build-hash\n    \
                  cookbook enrich --dry-run\n    \
                  cookbook -C ~/src/cook-book genrules\n    \
                  cookbook completions zsh"
)]
pub struct Cli {
    /// Cook-book root (defaults to current directory)
    #[arg(long, short = 'C', env = "COOKBOOK_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Suppress progress lines
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enrich recipe documents in place
    Enrich(EnrichArgs),

    /// List recipes whose Buck file contains a marker
    Genrules(GenrulesArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the enrich command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Run every pass:\n    cookbook enrich\n\n\
                  Only derive sub-paths (no network):\n    cookbook enrich --pass sub-path\n\n\
                  Resolve git remotes and hash their archives:\n    cookbook enrich --pass git-remote --pass source-hash\n\n\
                  See what would change:\n    cookbook enrich --dry-run\n\n\
                  Limit concurrent downloads:\n    cookbook enrich --fetch-limit 2")]
pub struct EnrichArgs {
    /// Passes to run (default: all, always applied in pipeline order)
    #[arg(long = "pass", value_name = "PASS", value_enum)]
    pub passes: Vec<Pass>,

    /// Recipes processed at once
    #[arg(long, short = 'j', env = "COOKBOOK_JOBS")]
    pub jobs: Option<usize>,

    /// Maximum concurrent downloads
    #[arg(long, env = "COOKBOOK_FETCH_LIMIT")]
    pub fetch_limit: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", env = "COOKBOOK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Recipe glob relative to the root
    #[arg(long, value_name = "GLOB", env = "COOKBOOK_PATTERN")]
    pub pattern: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the genrules command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Find recipes whose Buck file uses genrule:\n    cookbook genrules\n\n\
                  Search for another rule:\n    cookbook genrules --marker prebuilt_cxx_library")]
pub struct GenrulesArgs {
    /// Substring to look for in each Buck file
    #[arg(long)]
    pub marker: Option<String>,

    /// Recipe glob relative to the root
    #[arg(long, value_name = "GLOB", env = "COOKBOOK_PATTERN")]
    pub pattern: Option<String>,

    /// Recipes processed at once
    #[arg(long, short = 'j', env = "COOKBOOK_JOBS")]
    pub jobs: Option<usize>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    cookbook completions bash > ~/.bash_completion.d/cookbook\n\n\
                  Generate zsh completions:\n    cookbook completions zsh > ~/.zfunc/_cookbook\n\n\
                  Generate fish completions:\n    cookbook completions fish > ~/.config/fish/completions/cookbook.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

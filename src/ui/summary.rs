//! End-of-run summaries

use console::Style;

use crate::batch::BatchSummary;
use crate::batch::genrules::{DEFAULT_MARKER, FinderReport};
use crate::fetch::cache::CacheStats;

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Summary of an enrich run
pub fn format_enrich_summary(summary: &BatchSummary, stats: CacheStats, dry_run: bool) -> String {
    let bold = Style::new().bold();
    let mut lines = Vec::new();

    let headline = if dry_run {
        format!(
            "{} of {} would change",
            plural(summary.changed, "recipe"),
            summary.documents
        )
    } else {
        format!(
            "Wrote {} of {}",
            plural(summary.written, "recipe"),
            summary.documents
        )
    };
    lines.push(bold.apply_to(headline).to_string());

    lines.push(format!(
        "  {} {}",
        Style::new().green().apply_to("enriched:"),
        plural(summary.enriched_fields, "field")
    ));
    lines.push(format!(
        "  {} {} ({} cached)",
        Style::new().cyan().apply_to("fetched:"),
        plural(stats.fetches, "resource"),
        stats.hits
    ));
    if summary.degraded_versions > 0 {
        lines.push(format!(
            "  {} {} with missing fields",
            Style::new().yellow().apply_to("degraded:"),
            plural(summary.degraded_versions, "version")
        ));
    }
    if !summary.failed.is_empty() {
        lines.push(format!(
            "  {} {} skipped",
            Style::new().red().apply_to("failed:"),
            plural(summary.failed.len(), "recipe")
        ));
        for id in &summary.failed {
            lines.push(format!("    {}", id.display()));
        }
    }

    lines.join("\n")
}

/// Matching build files, each bracketed by its recipe path, then the match count
pub fn format_finder_report(report: &FinderReport, marker: &str) -> String {
    let mut out = String::new();
    for found in &report.matches {
        let tag = format!("##{}##", found.id.display());
        out.push_str(&format!("{tag}\n{}\n{tag}\n\n", found.build_file));
    }
    let count = Style::new().bold().apply_to(report.matches.len());
    if marker == DEFAULT_MARKER {
        out.push_str(&format!("{count} have {marker}s"));
    } else {
        out.push_str(&format!("{count} have {marker}"));
    }
    out
}

pub fn print_enrich_summary(summary: &BatchSummary, stats: CacheStats, dry_run: bool) {
    println!("{}", format_enrich_summary(summary, stats, dry_run));
}

pub fn print_finder_report(report: &FinderReport, marker: &str) {
    println!("{}", format_finder_report(report, marker));
}

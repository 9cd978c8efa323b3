//! Plain-text and JSON emission of the produced views.
//!
//! The views themselves are data (see [`crate::schema`]); this module is the
//! only place that turns them into terminal text. JSON output is always the
//! serialized view struct, so scripted callers get a stable shape.

use crate::schema::{CorpusStats, CoverageMap, HuntSummary, SearchHit};
use anyhow::Result;
use serde::Serialize;

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_summaries(hunts: &[HuntSummary]) {
    if hunts.is_empty() {
        println!("No hunts found.");
        return;
    }
    println!("Hunt catalog ({} total)", hunts.len());
    for hunt in hunts {
        let technique = hunt
            .techniques
            .first()
            .map(String::as_str)
            .unwrap_or("-");
        let findings = hunt.true_positives + hunt.false_positives;
        let findings = if findings > 0 {
            format!("{} ({} TP)", findings, hunt.true_positives)
        } else {
            "-".to_string()
        };
        println!(
            "{}  {:<40}  {:<12}  {:<10}  {}",
            hunt.hunt_id,
            truncate(&hunt.title, 40),
            hunt.status,
            technique,
            findings
        );
    }
}

pub fn print_stats(stats: &CorpusStats) {
    println!("Total hunts:     {}", stats.total);
    println!("Completed hunts: {}", stats.completed);
    println!("Total findings:  {}", stats.total_findings);
    println!("True positives:  {}", stats.true_positives);
    println!("False positives: {}", stats.false_positives);
    println!("Success rate:    {}%", stats.success_rate);
    println!("TP/FP ratio:     {}", stats.tp_fp_ratio);
}

pub fn print_coverage(coverage: &CoverageMap) {
    if coverage.is_empty() {
        println!("No coverage data available.");
        return;
    }
    for (tactic, techniques) in coverage {
        println!("{} ({} techniques)", tactic, techniques.len());
        for technique in techniques {
            println!("  - {technique}");
        }
    }
}

pub fn print_hits(query: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No hunts found matching '{query}'");
        return;
    }
    println!("Search results for '{}' ({} found)", query, hits.len());
    for hit in hits {
        println!("{}: {}", hit.hunt_id, hit.title);
        println!("  status: {} | file: {}", hit.status, hit.path);
    }
}

pub fn print_validation(name: &str, errors: &[String]) {
    if errors.is_empty() {
        println!("✓ {name}");
    } else {
        println!("✗ {name}");
        for error in errors {
            println!("    - {error}");
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("short", 40), "short");
    }

    #[test]
    fn truncate_marks_long_titles() {
        let long = "x".repeat(50);
        let shown = truncate(&long, 40);
        assert_eq!(shown.chars().count(), 40);
        assert!(shown.ends_with("..."));
    }
}

// Colored terminal output for acquisition runs and analysis reports.
//
// main.rs display functions delegate here. JSON output bypasses this module
// entirely and serializes the report as-is.

use colored::Colorize;

use crate::corpus::models::{CorpusSummary, YearlyCounts};
use crate::pipeline::acquire::{AcquisitionReport, MonthOutcome};
use crate::pipeline::analyze::AnalysisReport;
use crate::topics::clusters::TopicCluster;
use crate::topics::tfidf::label_from_keywords;

/// Width of the longest bar in the yearly histogram.
const BAR_WIDTH: usize = 40;

/// Display the outcome of a fetch run, including any degraded months.
pub fn display_acquisition(report: &AcquisitionReport) {
    let summary = &report.summary;
    println!(
        "\n{}",
        format!("=== Corpus ({} papers) ===", summary.total).bold()
    );
    println!("  File: {}", summary.file_path.display());
    println!();

    display_monthly_reported(summary);
    display_yearly_counts(&summary.yearly_counts);

    let failures: Vec<&MonthOutcome> = report.failures().collect();
    if failures.is_empty() {
        return;
    }

    println!(
        "\n  {} {} month(s) had provider failures; counts may be low:",
        "!".yellow().bold(),
        failures.len()
    );
    for month in failures {
        let mut reasons = Vec::new();
        if let Err(e) = &month.reported {
            reasons.push(format!("count probe: {e}"));
        }
        if let Some(e) = &month.fetch_error {
            reasons.push(format!("fetch after {} records: {e}", month.fetched));
        }
        println!("    {}  {}", month.window, reasons.join("; ").dimmed());
    }
}

/// Display an analysis report.
pub fn display_analysis(query: &str, report: &AnalysisReport) {
    println!(
        "\n{}",
        format!("=== Analysis: {} ({} papers) ===", query, report.total_papers).bold()
    );

    if report.total_papers == 0 {
        println!("  Corpus is empty. Try a broader query or more years.");
        return;
    }

    println!();
    display_yearly_counts(&report.yearly_counts);

    println!("\n{}", "Top terms".bold());
    display_term_list(&report.top_terms);

    println!("\n{}", "Growing terms".bold());
    if report.growing_terms.is_empty() {
        println!("  {}", "(not enough distinct years or frequent terms)".dimmed());
    } else {
        display_term_list(&report.growing_terms);
    }

    println!("\n{}", "Topics".bold());
    if report.topics.is_empty() {
        println!("  {}", "(no clusters: too few titled papers or no model)".dimmed());
    }
    for topic in &report.topics {
        display_topic(topic, false);
    }

    if !report.emerging_topics.is_empty() {
        println!("\n{}", "Emerging topics".bold());
        for topic in &report.emerging_topics {
            display_topic(topic, true);
        }
    }
    println!();
}

/// Per-year histogram scaled to the largest year.
fn display_yearly_counts(counts: &YearlyCounts) {
    let max = counts.values().copied().max().unwrap_or(0);
    for (year, &count) in counts {
        let len = if max == 0 {
            0
        } else {
            (count as usize * BAR_WIDTH).div_ceil(max as usize)
        };
        println!("  {}  {:>6}  {}", year, count, "#".repeat(len).cyan());
    }
}

/// Reported totals per year, from the count probes.
fn display_monthly_reported(summary: &CorpusSummary) {
    for (year, months) in &summary.monthly_counts {
        let reported: u64 = months.values().sum();
        println!(
            "  {}  {} reported by source across {} month(s)",
            year,
            reported.to_string().bold(),
            months.len()
        );
    }
    println!();
}

fn display_term_list(terms: &[String]) {
    if terms.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for line in terms.chunks(6) {
        println!("  {}", line.join(", "));
    }
}

fn display_topic(topic: &TopicCluster, emerging: bool) {
    let label = label_from_keywords(&topic.keywords);
    let marker = if emerging {
        "^".green().bold()
    } else {
        "-".normal()
    };
    println!(
        "  {} [{:>4} papers] {}",
        marker,
        topic.size,
        label.cyan()
    );
    for title in &topic.representative_titles {
        println!("        {}", super::truncate_chars(title, 100).dimmed());
    }
}

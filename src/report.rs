//! Output formatting for conversion runs.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::engine::{FileOutcome, FileReport, Summary};

/// JSON report structure for a whole run.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: String,
    pub target: String,
    pub dry_run: bool,
    pub statistics: &'a Summary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub converted_files: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manual_review_files: Vec<JsonManualFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_files: Vec<JsonSkippedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonErrorFile>,
}

#[derive(Serialize)]
pub struct JsonManualFile {
    pub file: String,
    pub reasons: Vec<String>,
}

#[derive(Serialize)]
pub struct JsonSkippedFile {
    pub file: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct JsonErrorFile {
    pub file: String,
    pub message: String,
}

/// Write the run report in JSON format.
pub fn write_json(
    target: &str,
    dry_run: bool,
    reports: &[FileReport],
    summary: &Summary,
) -> anyhow::Result<()> {
    let converted_files = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::Converted)
        .map(|r| r.path.to_string_lossy().to_string())
        .collect();

    let manual_review_files = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::ManualReview)
        .map(|r| JsonManualFile {
            file: r.path.to_string_lossy().to_string(),
            reasons: r.reasons.iter().map(|t| t.as_str().to_string()).collect(),
        })
        .collect();

    let skipped_files = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::Skipped)
        .map(|r| JsonSkippedFile {
            file: r.path.to_string_lossy().to_string(),
            reason: r
                .skip_reason
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect();

    let errors = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::Error)
        .map(|r| JsonErrorFile {
            file: r.path.to_string_lossy().to_string(),
            message: r.error.clone().unwrap_or_default(),
        })
        .collect();

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: target.to_string(),
        dry_run,
        statistics: summary,
        converted_files,
        manual_review_files,
        skipped_files,
        errors,
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

/// Write the run report in pretty (human-readable) format.
pub fn write_pretty(target: &str, dry_run: bool, reports: &[FileReport], summary: &Summary) {
    println!();
    print!("  ");
    print!("{}", "calloutconv".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Target: ".dimmed());
    println!("{}", target);
    if dry_run {
        println!("  {}", "Dry run: no files were modified".yellow());
    }
    println!();

    write_statistics(summary);
    println!();

    let manual: Vec<&FileReport> = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::ManualReview)
        .collect();
    if !manual.is_empty() {
        write_manual_review(&manual);
        println!();
    }

    let skipped: Vec<&FileReport> = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::Skipped)
        .collect();
    if !skipped.is_empty() {
        write_skipped(&skipped);
        println!();
    }

    let errors: Vec<&FileReport> = reports
        .iter()
        .filter(|r| r.outcome == FileOutcome::Error)
        .collect();
    if !errors.is_empty() {
        write_errors(&errors);
        println!();
    }
}

fn write_statistics(summary: &Summary) {
    println!("  {}", "Summary:".bold());
    println!("    files scanned        {:>5}", summary.files_scanned);
    print!("    files converted      ");
    if summary.files_converted > 0 {
        println!("{:>5}", summary.files_converted.to_string().green());
    } else {
        println!("{:>5}", summary.files_converted);
    }
    print!("    files manual review  ");
    if summary.files_manual_review > 0 {
        println!("{:>5}", summary.files_manual_review.to_string().yellow());
    } else {
        println!("{:>5}", summary.files_manual_review);
    }
    println!("    files skipped        {:>5}", summary.files_skipped);
    println!("    files no callouts    {:>5}", summary.files_no_callouts);
    if summary.files_errored > 0 {
        println!(
            "    files errored        {:>5}",
            summary.files_errored.to_string().red()
        );
    }

    if !summary.converted_by_dialect.is_empty() {
        println!();
        println!("  {}", "Converted blocks by dialect:".bold());
        for (dialect, count) in &summary.converted_by_dialect {
            println!("    {:<12} {:>5}", dialect, count);
        }
    }
}

fn write_manual_review(manual: &[&FileReport]) {
    println!("  {} ({}):", "Manual review".bold(), manual.len());
    println!();

    // Group files under each reason tag.
    let mut by_reason: BTreeMap<&str, Vec<&FileReport>> = BTreeMap::new();
    for report in manual {
        for reason in &report.reasons {
            by_reason.entry(reason.as_str()).or_default().push(report);
        }
    }

    for (tag, files) in by_reason {
        println!("    {}", tag.yellow());
        for report in files {
            println!("      {}", report.path.display().to_string().blue());
        }
        println!();
    }
}

fn write_skipped(skipped: &[&FileReport]) {
    println!("  {} ({}):", "Skipped".dimmed(), skipped.len());
    for report in skipped {
        let reason = report.skip_reason.map(|s| s.as_str()).unwrap_or("");
        println!(
            "    {:<14} {}",
            reason.dimmed(),
            report.path.display().to_string().blue()
        );
    }
}

fn write_errors(errors: &[&FileReport]) {
    println!("  {} ({}):", "Errors".red().bold(), errors.len());
    for report in errors {
        println!(
            "    {} {}",
            report.path.display().to_string().blue(),
            report.error.as_deref().unwrap_or("").red()
        );
    }
}

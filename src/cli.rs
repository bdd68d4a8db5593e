//! Command-line interface for calloutconv.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::{self, Summary};
use crate::report;
use crate::walk;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Convert AsciiDoc callout annotations to definition lists.
///
/// Calloutconv scans documentation modules for source blocks annotated with
/// numbered callout markers and rewrites each block it can map unambiguously
/// into `term:: explanation` form. Blocks it cannot convert safely are
/// reported for manual review with reason tags.
#[derive(Parser)]
#[command(name = "calloutconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert callout blocks in place
    Convert(ConvertArgs),
    /// Report what would convert, without touching any file
    #[command(visible_alias = "check")]
    Scan(ConvertArgs),
}

/// Arguments shared by the convert and scan commands.
#[derive(Parser)]
pub struct ConvertArgs {
    /// Path to process (file or directory)
    pub path: PathBuf,

    /// Compute and report conversions without writing files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Print a progress line per file to stderr
    #[arg(long)]
    pub debug: bool,

    /// Only process modules included from assembly files
    #[arg(long)]
    pub assembly_mode: bool,
}

/// Run the convert command. `force_dry_run` is set by the scan subcommand.
pub fn run_convert(args: &ConvertArgs, force_dry_run: bool) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    if !args.path.exists() {
        eprintln!("Error: cannot access path {:?}", args.path);
        return Ok(EXIT_ERROR);
    }

    let dry_run = force_dry_run || args.dry_run;

    let mut files = walk::collect_files(&args.path);
    if files.is_empty() {
        eprintln!("Warning: no documentation files found under {:?}", args.path);
        return Ok(EXIT_SUCCESS);
    }

    if args.assembly_mode {
        let reachable = walk::assembly_reachable(&files);
        files.retain(|p| {
            let canonical = p.canonicalize().unwrap_or_else(|_| p.clone());
            reachable.contains(p) || reachable.contains(&canonical)
        });
        if files.is_empty() {
            eprintln!("Warning: no modules reachable from assembly files");
            return Ok(EXIT_SUCCESS);
        }
    }

    let mut reports = Vec::with_capacity(files.len());
    let mut summary = Summary::default();
    for path in &files {
        if args.debug {
            eprintln!("processing {}", path.display());
        }
        let report = engine::process_file(path, dry_run);
        summary.record(&report);
        reports.push(report);
    }

    let target = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&target, dry_run, &reports, &summary)?,
        _ => report::write_pretty(&target, dry_run, &reports, &summary),
    }

    if summary.has_errors() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

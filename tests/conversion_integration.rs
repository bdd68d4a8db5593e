//! Integration tests for the full conversion pipeline.
//!
//! Fixtures under `testdata/` are copied into a temporary directory before
//! each run, since conversion rewrites files in place.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use calloutconv::classify::ReviewReason;
use calloutconv::engine::{process_file, FileOutcome, Summary};
use calloutconv::walk;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let dest = dir.path().join(name);
    fs::copy(testdata_path().join(name), &dest).expect("fixture should copy");
    dest
}

fn run_dir(root: &Path, dry_run: bool) -> (Vec<calloutconv::FileReport>, Summary) {
    let mut summary = Summary::default();
    let mut reports = Vec::new();
    for path in walk::collect_files(root) {
        let report = process_file(&path, dry_run);
        summary.record(&report);
        reports.push(report);
    }
    (reports, summary)
}

#[test]
fn test_clean_module_converts_fully() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, "clean_module.adoc");

    let report = process_file(&path, false);
    assert_eq!(report.outcome, FileOutcome::Converted);
    assert_eq!(report.blocks.converted, 2);

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("<1>"), "markers should be gone: {}", text);
    assert!(text.contains("name:: Specifies the pod name"));
    assert!(text.contains("namespace:: Specifies the target namespace"));
    assert!(text.contains("image:: Specifies the container image to pull"));
    assert!(text.contains("`oc`:: Creates the pod on the cluster"));
    // Prose around the blocks is untouched.
    assert!(text.starts_with(":_mod-docs-content-type: PROCEDURE"));
    assert!(text.contains("Apply it:"));
}

#[test]
fn test_conversion_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, "clean_module.adoc");

    assert_eq!(process_file(&path, false).outcome, FileOutcome::Converted);
    let first = fs::read_to_string(&path).unwrap();

    let second_report = process_file(&path, false);
    assert_eq!(second_report.outcome, FileOutcome::NoCallouts);
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_needs_review_left_untouched() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, "needs_review.adoc");
    let original = fs::read_to_string(&path).unwrap();

    let report = process_file(&path, false);
    assert_eq!(report.outcome, FileOutcome::ManualReview);
    assert!(report.reasons.contains(&ReviewReason::NonSequentialMarkers));
    assert!(report.reasons.contains(&ReviewReason::UnknownDialect));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_mixed_module_converts_around_excluded_block() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, "mixed.adoc");

    let report = process_file(&path, false);
    assert_eq!(report.outcome, FileOutcome::Converted);
    assert_eq!(report.blocks.converted, 1);
    assert_eq!(report.blocks.excluded, 1);

    let text = fs::read_to_string(&path).unwrap();
    // The already-converted block is untouched, marker and all.
    assert!(text.contains("kind: Service <1>"));
    assert!(text.contains("kind:: The resource kind"));
    // The annotated block converted.
    assert!(text.contains("port:: The service port"));
    // The marker-less block is untouched.
    assert!(text.contains("echo done"));
}

#[test]
fn test_directory_run_aggregates_summary() {
    let dir = TempDir::new().unwrap();
    copy_fixture(&dir, "clean_module.adoc");
    copy_fixture(&dir, "needs_review.adoc");
    copy_fixture(&dir, "mixed.adoc");
    fs::write(dir.path().join("empty.adoc"), "").unwrap();

    let (_, summary) = run_dir(dir.path(), false);
    assert_eq!(summary.files_scanned, 4);
    assert_eq!(summary.files_converted, 2);
    assert_eq!(summary.files_manual_review, 1);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.blocks_converted, 3);
    assert_eq!(summary.converted_by_dialect.get("data"), Some(&2));
    assert_eq!(summary.converted_by_dialect.get("shell"), Some(&1));
    assert_eq!(summary.skipped_by_reason.get("empty"), Some(&1));
    assert!(summary
        .manual_by_reason
        .contains_key("non_sequential_markers"));
}

#[test]
fn test_dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let clean = copy_fixture(&dir, "clean_module.adoc");
    let original = fs::read_to_string(&clean).unwrap();

    let (reports, summary) = run_dir(dir.path(), true);
    assert_eq!(summary.files_converted, 1);
    assert_eq!(reports[0].blocks.converted, 2);
    assert_eq!(fs::read_to_string(&clean).unwrap(), original);
}

#[test]
fn test_assembly_mode_restricts_processing_set() {
    let dir = TempDir::new().unwrap();
    copy_fixture(&dir, "clean_module.adoc");
    copy_fixture(&dir, "needs_review.adoc");
    fs::write(
        dir.path().join("assembly.adoc"),
        ":_mod-docs-content-type: ASSEMBLY\n\ninclude::clean_module.adoc[leveloffset=+1]\n",
    )
    .unwrap();

    let files = walk::collect_files(dir.path());
    let reachable = walk::assembly_reachable(&files);

    let included: Vec<_> = files
        .iter()
        .filter(|p| {
            let canonical = p.canonicalize().unwrap_or_else(|_| (*p).clone());
            reachable.contains(*p) || reachable.contains(&canonical)
        })
        .collect();
    assert_eq!(included.len(), 2);
    assert!(included.iter().any(|p| p.ends_with("assembly.adoc")));
    assert!(included.iter().any(|p| p.ends_with("clean_module.adoc")));
    assert!(!included.iter().any(|p| p.ends_with("needs_review.adoc")));
}

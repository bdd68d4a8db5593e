//! Per-file pipeline: scan, classify, convert, rewrite.
//!
//! One file is fully processed before the next; blocks and verdicts live only
//! for the duration of the file. Only the aggregate [`Summary`] survives
//! across files.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::{classify_block, ReviewReason, Verdict};
use crate::convert::convert_block;
use crate::rewrite;
use crate::scan::{scan_blocks, Dialect};
use crate::walk::{self, SkipReason};

/// Final disposition of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    /// At least one block was rewritten (or would be, under dry run).
    Converted,
    /// A candidate block needs human attention; the file was left untouched.
    ManualReview,
    /// The file failed pre-read validation.
    Skipped,
    /// Reading or writing the file failed.
    Error,
    /// No convertible callout blocks were found.
    NoCallouts,
}

impl FileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOutcome::Converted => "converted",
            FileOutcome::ManualReview => "manual_review",
            FileOutcome::Skipped => "skipped",
            FileOutcome::Error => "error",
            FileOutcome::NoCallouts => "no_callouts",
        }
    }
}

/// Per-file block counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockCounts {
    pub total: usize,
    pub converted: usize,
    pub manual_review: usize,
    pub excluded: usize,
}

/// Outcome record for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub blocks: BlockCounts,
    /// Union of manual-review reasons across blocks, in first-seen order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<ReviewReason>,
    /// Non-blocking flags raised by converted blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ReviewReason>,
    /// Dialects of the converted blocks, one record per block.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dialects: Vec<Dialect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn new(path: &Path, outcome: FileOutcome) -> Self {
        FileReport {
            path: path.to_path_buf(),
            outcome,
            blocks: BlockCounts::default(),
            reasons: Vec::new(),
            flags: Vec::new(),
            dialects: Vec::new(),
            skip_reason: None,
            error: None,
        }
    }

    fn skipped(path: &Path, reason: SkipReason) -> Self {
        let mut r = FileReport::new(path, FileOutcome::Skipped);
        r.skip_reason = Some(reason);
        r
    }

    fn errored(path: &Path, message: String) -> Self {
        let mut r = FileReport::new(path, FileOutcome::Error);
        r.error = Some(message);
        r
    }
}

/// Result of running the pipeline over in-memory text.
#[derive(Debug)]
pub struct TextResult {
    /// The rewritten document, present only when at least one block converted
    /// and none needed manual review.
    pub rewritten: Option<String>,
    pub blocks: BlockCounts,
    pub reasons: Vec<ReviewReason>,
    pub flags: Vec<ReviewReason>,
    pub dialects: Vec<Dialect>,
}

fn push_unique(reasons: &mut Vec<ReviewReason>, reason: ReviewReason) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}

/// Run scan, classify, convert, rewrite over document text.
///
/// Whole-file atomicity: any manual-review block suppresses every rewrite in
/// the file. Excluded and marker-less blocks never block their neighbors.
pub fn process_text(text: &str) -> TextResult {
    let blocks = scan_blocks(text);
    let mut result = TextResult {
        rewritten: None,
        blocks: BlockCounts {
            total: blocks.len(),
            ..BlockCounts::default()
        },
        reasons: Vec::new(),
        flags: Vec::new(),
        dialects: Vec::new(),
    };

    let mut replacements: Vec<(std::ops::Range<usize>, String)> = Vec::new();

    for block in &blocks {
        match classify_block(block) {
            Verdict::Automatable { terms, flags } => match convert_block(block, &terms) {
                Ok(replacement) => {
                    result.blocks.converted += 1;
                    result.dialects.push(block.dialect);
                    for flag in flags {
                        push_unique(&mut result.flags, flag);
                    }
                    replacements.push((block.span.clone(), replacement));
                }
                Err(_) => {
                    // Defensive: extraction produced terms the converter
                    // could not pair up.
                    result.blocks.manual_review += 1;
                    push_unique(&mut result.reasons, ReviewReason::UnmatchedTerm);
                }
            },
            Verdict::ManualReview { reasons } => {
                result.blocks.manual_review += 1;
                for reason in reasons {
                    push_unique(&mut result.reasons, reason);
                }
            }
            Verdict::Excluded { .. } => result.blocks.excluded += 1,
        }
    }

    if result.blocks.manual_review == 0 && result.blocks.converted > 0 {
        result.rewritten = Some(rewrite::apply(text, &replacements));
    } else {
        // Suppressed conversions contribute nothing to the report.
        result.blocks.converted = 0;
        result.dialects.clear();
        result.flags.clear();
    }

    result
}

/// Process one file on disk. Writes the rewritten text back unless `dry_run`.
pub fn process_file(path: &Path, dry_run: bool) -> FileReport {
    let text = match walk::load_file(path) {
        Ok(t) => t,
        Err(reason) => return FileReport::skipped(path, reason),
    };

    let result = process_text(&text);
    let outcome = if result.blocks.manual_review > 0 {
        FileOutcome::ManualReview
    } else if result.rewritten.is_some() {
        FileOutcome::Converted
    } else {
        FileOutcome::NoCallouts
    };

    let mut report = FileReport::new(path, outcome);
    report.blocks = result.blocks;
    report.reasons = result.reasons;
    report.flags = result.flags;
    report.dialects = result.dialects;

    if let Some(rewritten) = result.rewritten {
        if !dry_run {
            // Temp-and-rename so a failed write cannot truncate the original.
            if let Err(e) = walk::write_atomic(path, &rewritten) {
                return FileReport::errored(path, format!("write failed: {}", e));
            }
        }
    }

    report
}

/// Aggregate counters for a whole run.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub files_scanned: usize,
    pub files_converted: usize,
    pub files_manual_review: usize,
    pub files_skipped: usize,
    pub files_errored: usize,
    pub files_no_callouts: usize,
    pub blocks_converted: usize,
    pub blocks_manual_review: usize,
    pub blocks_excluded: usize,
    pub converted_by_dialect: BTreeMap<String, usize>,
    pub manual_by_reason: BTreeMap<String, usize>,
    pub skipped_by_reason: BTreeMap<String, usize>,
}

impl Summary {
    pub fn record(&mut self, report: &FileReport) {
        self.files_scanned += 1;
        match report.outcome {
            FileOutcome::Converted => self.files_converted += 1,
            FileOutcome::ManualReview => self.files_manual_review += 1,
            FileOutcome::Skipped => self.files_skipped += 1,
            FileOutcome::Error => self.files_errored += 1,
            FileOutcome::NoCallouts => self.files_no_callouts += 1,
        }
        self.blocks_converted += report.blocks.converted;
        self.blocks_manual_review += report.blocks.manual_review;
        self.blocks_excluded += report.blocks.excluded;
        for dialect in &report.dialects {
            *self
                .converted_by_dialect
                .entry(dialect.as_str().to_string())
                .or_insert(0) += 1;
        }
        for reason in &report.reasons {
            *self
                .manual_by_reason
                .entry(reason.as_str().to_string())
                .or_insert(0) += 1;
        }
        if let Some(reason) = report.skip_reason {
            *self
                .skipped_by_reason
                .entry(reason.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.files_errored > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const CLEAN_DOC: &str = "\
= Title

[source,yaml]
----
name: my-pod <1>
namespace: default <2>
----
<1> Specifies the pod name
<2> Specifies the namespace
";

    const MIXED_DOC: &str = "\
[source,yaml]
----
a: 1 <1>
----
<1> Fine

[source,yaml]
----
b: 2 <1>
c: 3 <3>
----
<1> Broken
<3> Broken
";

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_process_text_converts_clean_document() {
        let result = process_text(CLEAN_DOC);
        assert_eq!(result.blocks.converted, 1);
        let rewritten = result.rewritten.unwrap();
        assert!(rewritten.contains("name:: Specifies the pod name"));
        assert!(!rewritten.contains("<1>"));
        assert!(rewritten.starts_with("= Title\n"));
    }

    #[test]
    fn test_process_text_atomicity() {
        // One good block plus one broken block: nothing converts.
        let result = process_text(MIXED_DOC);
        assert!(result.rewritten.is_none());
        assert_eq!(result.blocks.converted, 0);
        assert_eq!(result.blocks.manual_review, 1);
        assert!(result.reasons.contains(&ReviewReason::NonSequentialMarkers));
    }

    #[test]
    fn test_process_text_excluded_does_not_block() {
        let doc = "\
[source,yaml]
----
a: 1 <1>
----
a:: Already converted

[source,yaml]
----
b: 2 <1>
----
<1> Fresh
";
        let result = process_text(doc);
        assert_eq!(result.blocks.excluded, 1);
        assert_eq!(result.blocks.converted, 1);
        let rewritten = result.rewritten.unwrap();
        assert!(rewritten.contains("a:: Already converted"));
        assert!(rewritten.contains("b:: Fresh"));
    }

    #[test]
    fn test_suppressed_conversion_drops_its_flags() {
        // A convertible comment-only block next to a broken block: the file
        // is manual review and must not report flags for conversions that
        // never happened.
        let doc = "\
[source,bash]
----
oc apply -f pod.yaml
# <1>
----
<1> Wait for rollout

[source,yaml]
----
b: 2 <1>
c: 3 <3>
----
<1> Broken
<3> Broken
";
        let result = process_text(doc);
        assert!(result.rewritten.is_none());
        assert!(result.flags.is_empty());
        assert!(result.reasons.contains(&ReviewReason::NonSequentialMarkers));
    }

    #[test]
    fn test_process_file_writes_conversion() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.adoc", CLEAN_DOC);
        let report = process_file(&path, false);
        assert_eq!(report.outcome, FileOutcome::Converted);
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("namespace:: Specifies the namespace"));
    }

    #[test]
    fn test_process_file_dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.adoc", CLEAN_DOC);
        let report = process_file(&path, true);
        assert_eq!(report.outcome, FileOutcome::Converted);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CLEAN_DOC);
    }

    #[test]
    fn test_process_file_manual_review_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.adoc", MIXED_DOC);
        let report = process_file(&path, false);
        assert_eq!(report.outcome, FileOutcome::ManualReview);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), MIXED_DOC);
    }

    #[test]
    fn test_process_file_no_callouts() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.adoc", "= Plain document\n\nNo code here.\n");
        let report = process_file(&path, false);
        assert_eq!(report.outcome, FileOutcome::NoCallouts);
    }

    #[test]
    fn test_summary_aggregation() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.adoc", CLEAN_DOC);
        let bad = write_file(&dir, "bad.adoc", MIXED_DOC);
        let empty = write_file(&dir, "empty.adoc", "");

        let mut summary = Summary::default();
        for path in [&good, &bad, &empty] {
            summary.record(&process_file(path, true));
        }
        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.files_converted, 1);
        assert_eq!(summary.files_manual_review, 1);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.converted_by_dialect.get("data"), Some(&1));
        assert_eq!(
            summary.manual_by_reason.get("non_sequential_markers"),
            Some(&1)
        );
        assert_eq!(summary.skipped_by_reason.get("empty"), Some(&1));
        assert!(!summary.has_errors());
    }
}

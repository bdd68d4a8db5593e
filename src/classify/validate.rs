//! Structural validation of scanned callout blocks.
//!
//! Checks marker sequencing, uniqueness, and completeness. All checks run
//! independently; every violated check is reported, not just the first.

use std::collections::HashMap;

use super::ReviewReason;
use crate::scan::CodeBlock;

/// Validate a block's marker structure.
///
/// Returns an empty vector when the block passes; otherwise the reason tags
/// in check order. Only a block passing all checks proceeds to extraction.
pub fn validate(block: &CodeBlock) -> Vec<ReviewReason> {
    let mut reasons = Vec::new();

    // Check 1: one marker per line.
    let mut per_line: HashMap<usize, usize> = HashMap::new();
    for m in &block.markers {
        *per_line.entry(m.line).or_insert(0) += 1;
    }
    if per_line.values().any(|&count| count > 1) {
        reasons.push(ReviewReason::MultipleMarkersPerLine);
    }

    // Check 2: no marker number shared across lines.
    let mut lines_per_number: HashMap<u32, Vec<usize>> = HashMap::new();
    for m in &block.markers {
        let lines = lines_per_number.entry(m.number).or_default();
        if !lines.contains(&m.line) {
            lines.push(m.line);
        }
    }
    if lines_per_number.values().any(|lines| lines.len() > 1) {
        reasons.push(ReviewReason::DuplicateMarkers);
    }

    // Check 3: inline numbers form exactly 1..N. A marker whose number was
    // too large to represent breaks the sequence by definition.
    let inline = block.inline_numbers();
    let expected: Vec<u32> = (1..=inline.len() as u32).collect();
    if block.invalid_markers || inline != expected {
        reasons.push(ReviewReason::NonSequentialMarkers);
    }

    // Check 4: inline set equals trailing set (bijection).
    if inline != block.entry_numbers() {
        reasons.push(ReviewReason::MarkerCountMismatch);
    }

    // Check 5: recognized dialect.
    if !block.dialect.is_recognized() {
        reasons.push(ReviewReason::UnknownDialect);
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan_blocks;

    fn block(doc: &str) -> CodeBlock {
        let mut blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1, "fixture should scan to one block");
        blocks.remove(0)
    }

    #[test]
    fn test_valid_block_passes() {
        let b = block(
            "[source,yaml]\n----\na: 1 <1>\nb: 2 <2>\n----\n<1> First\n<2> Second\n",
        );
        assert!(validate(&b).is_empty());
    }

    #[test]
    fn test_non_sequential_markers() {
        let b = block("[source,yaml]\n----\na: 1 <1>\nb: 2 <3>\n----\n<1> First\n<3> Third\n");
        assert_eq!(validate(&b), vec![ReviewReason::NonSequentialMarkers]);
    }

    #[test]
    fn test_overflowing_marker_number_blocks_conversion() {
        // The token would be stripped by conversion while its explanation
        // stays behind, so the block must not convert.
        let b = block(
            "[source,yaml]\n----\na: 1 <1>\nb: 2 <99999999999>\n----\n<1> First\n",
        );
        assert!(validate(&b).contains(&ReviewReason::NonSequentialMarkers));
    }

    #[test]
    fn test_duplicate_marker_across_lines() {
        let b = block("[source,yaml]\n----\na: 1 <1>\nb: 2 <1>\n----\n<1> Shared\n");
        let reasons = validate(&b);
        assert!(reasons.contains(&ReviewReason::DuplicateMarkers));
    }

    #[test]
    fn test_multiple_markers_on_one_line() {
        let b = block("[source,yaml]\n----\na: 1 <1> <2>\n----\n<1> First\n<2> Second\n");
        let reasons = validate(&b);
        assert!(reasons.contains(&ReviewReason::MultipleMarkersPerLine));
    }

    #[test]
    fn test_marker_count_mismatch_subset() {
        let b = block("[source,yaml]\n----\na: 1 <1>\nb: 2 <2>\n----\n<1> Only one\n");
        assert_eq!(validate(&b), vec![ReviewReason::MarkerCountMismatch]);
    }

    #[test]
    fn test_marker_count_mismatch_superset() {
        let b = block("[source,yaml]\n----\na: 1 <1>\n----\n<1> First\n<2> Extra\n");
        assert_eq!(validate(&b), vec![ReviewReason::MarkerCountMismatch]);
    }

    #[test]
    fn test_unknown_dialect_flagged() {
        let b = block("[source,rust]\n----\nlet x = 1; <1>\n----\n<1> A binding\n");
        assert_eq!(validate(&b), vec![ReviewReason::UnknownDialect]);
    }

    #[test]
    fn test_all_failures_reported_together() {
        // Non-sequential AND mismatched AND unknown dialect at once.
        let b = block("[source,rust]\n----\nlet x = 1; <2>\n----\n<1> Wrong\n");
        let reasons = validate(&b);
        assert!(reasons.contains(&ReviewReason::NonSequentialMarkers));
        assert!(reasons.contains(&ReviewReason::MarkerCountMismatch));
        assert!(reasons.contains(&ReviewReason::UnknownDialect));
        assert_eq!(reasons.len(), 3);
    }
}

//! Classification of scanned blocks into automatable and manual-review.
//!
//! Orchestrates the structural validator, the per-dialect term extractors,
//! and the semantic risk detector to produce one [`Verdict`] per block.

mod risk;
mod types;
mod validate;

pub use risk::{find_duplicate_term, is_placeholder};
pub use types::{ReviewReason, Verdict};
pub use validate::validate;

use crate::extract;
use crate::scan::CodeBlock;

/// Classify one scanned block.
///
/// Exclusions (already converted, conditional) are decided first; then the
/// structural checks; then extraction plus risk assessment. A manual-review
/// verdict carries every reason that fired, in check order.
pub fn classify_block(block: &CodeBlock) -> Verdict {
    if block.has_deflist {
        return Verdict::Excluded {
            reason: ReviewReason::AlreadyConverted,
        };
    }
    if block.conditional {
        return Verdict::Excluded {
            reason: ReviewReason::ConditionalDirective,
        };
    }

    let structural = validate(block);
    if !structural.is_empty() {
        return Verdict::ManualReview { reasons: structural };
    }

    // Structure is sound: one marker per line, numbers exactly 1..N, a
    // matching trailing entry for each. Extract a term per marker.
    let mut terms: Vec<(u32, String)> = Vec::new();
    let mut flags: Vec<ReviewReason> = Vec::new();
    let mut blocking: Vec<ReviewReason> = Vec::new();

    for number in block.inline_numbers() {
        let line = block
            .markers
            .iter()
            .find(|m| m.number == number)
            .map(|m| block.code[m.line].as_str())
            .unwrap_or("");

        if extract::is_comment_only(line) {
            // Convertible under the synthetic-term policy; flagged so the
            // report still surfaces it.
            push_unique(&mut flags, ReviewReason::CommentOnlyMarker);
            terms.push((number, format!("note-{}", number)));
            continue;
        }

        match extract::extract_term(block.dialect, line) {
            Some(term) => {
                if risk::is_placeholder(&term) {
                    push_unique(&mut blocking, ReviewReason::PlaceholderTerm);
                }
                terms.push((number, term));
            }
            None => push_unique(&mut blocking, ReviewReason::UnmatchedTerm),
        }
    }

    if risk::find_duplicate_term(&terms).is_some() {
        push_unique(&mut blocking, ReviewReason::DuplicateTerm);
    }

    if !blocking.is_empty() {
        return Verdict::ManualReview { reasons: blocking };
    }

    Verdict::Automatable { terms, flags }
}

/// Classify every block of a scanned document, in order.
pub fn classify_blocks(blocks: &[CodeBlock]) -> Vec<Verdict> {
    blocks.iter().map(classify_block).collect()
}

fn push_unique(reasons: &mut Vec<ReviewReason>, reason: ReviewReason) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}

//! Core types for classification verdicts.

use serde::{Deserialize, Serialize};

/// Reason tags for routing a block to manual review or exclusion.
///
/// The taxonomy is fixed; report output uses the snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewReason {
    #[serde(rename = "non_sequential_markers")]
    NonSequentialMarkers,
    #[serde(rename = "duplicate_markers")]
    DuplicateMarkers,
    #[serde(rename = "marker_count_mismatch")]
    MarkerCountMismatch,
    #[serde(rename = "multiple_markers_per_line")]
    MultipleMarkersPerLine,
    #[serde(rename = "comment_only_marker")]
    CommentOnlyMarker,
    #[serde(rename = "placeholder_term")]
    PlaceholderTerm,
    #[serde(rename = "unknown_dialect")]
    UnknownDialect,
    #[serde(rename = "unmatched_term")]
    UnmatchedTerm,
    #[serde(rename = "already_converted")]
    AlreadyConverted,
    #[serde(rename = "conditional_directive")]
    ConditionalDirective,
    #[serde(rename = "duplicate_term")]
    DuplicateTerm,
}

impl ReviewReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewReason::NonSequentialMarkers => "non_sequential_markers",
            ReviewReason::DuplicateMarkers => "duplicate_markers",
            ReviewReason::MarkerCountMismatch => "marker_count_mismatch",
            ReviewReason::MultipleMarkersPerLine => "multiple_markers_per_line",
            ReviewReason::CommentOnlyMarker => "comment_only_marker",
            ReviewReason::PlaceholderTerm => "placeholder_term",
            ReviewReason::UnknownDialect => "unknown_dialect",
            ReviewReason::UnmatchedTerm => "unmatched_term",
            ReviewReason::AlreadyConverted => "already_converted",
            ReviewReason::ConditionalDirective => "conditional_directive",
            ReviewReason::DuplicateTerm => "duplicate_term",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "non_sequential_markers" => Some(ReviewReason::NonSequentialMarkers),
            "duplicate_markers" => Some(ReviewReason::DuplicateMarkers),
            "marker_count_mismatch" => Some(ReviewReason::MarkerCountMismatch),
            "multiple_markers_per_line" => Some(ReviewReason::MultipleMarkersPerLine),
            "comment_only_marker" => Some(ReviewReason::CommentOnlyMarker),
            "placeholder_term" => Some(ReviewReason::PlaceholderTerm),
            "unknown_dialect" => Some(ReviewReason::UnknownDialect),
            "unmatched_term" => Some(ReviewReason::UnmatchedTerm),
            "already_converted" => Some(ReviewReason::AlreadyConverted),
            "conditional_directive" => Some(ReviewReason::ConditionalDirective),
            "duplicate_term" => Some(ReviewReason::DuplicateTerm),
            _ => None,
        }
    }

    /// Human-readable reason for the manual-review listing.
    pub fn description(&self) -> &'static str {
        match self {
            ReviewReason::NonSequentialMarkers => {
                "callout markers are not a contiguous 1..N sequence"
            }
            ReviewReason::DuplicateMarkers => {
                "the same marker number appears on more than one code line"
            }
            ReviewReason::MarkerCountMismatch => {
                "inline markers and trailing explanations do not match up"
            }
            ReviewReason::MultipleMarkersPerLine => {
                "a single code line carries more than one callout marker"
            }
            ReviewReason::CommentOnlyMarker => {
                "a callout sits on a comment-only line with no code term"
            }
            ReviewReason::PlaceholderTerm => {
                "the extracted term reads as a semantic placeholder (e.g. PASSWORD)"
            }
            ReviewReason::UnknownDialect => "the fence declares an unsupported dialect",
            ReviewReason::UnmatchedTerm => {
                "no meaningful term could be extracted from a marked line"
            }
            ReviewReason::AlreadyConverted => {
                "the block already uses definition-list syntax"
            }
            ReviewReason::ConditionalDirective => {
                "the block is touched by a conditional-inclusion directive"
            }
            ReviewReason::DuplicateTerm => {
                "two markers extract the same term, which would collide in the definition list"
            }
        }
    }
}

impl std::fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification verdict for one scanned block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Conversion can proceed; carries the marker -> term mapping in
    /// ascending marker order, plus non-blocking flags (comment-only).
    Automatable {
        terms: Vec<(u32, String)>,
        flags: Vec<ReviewReason>,
    },
    /// Unsafe to convert automatically; carries the reason tags in the
    /// order the checks fired.
    ManualReview { reasons: Vec<ReviewReason> },
    /// Not a candidate at all (already converted, or conditional). Excluded
    /// blocks never block conversion of their neighbors.
    Excluded { reason: ReviewReason },
}

impl Verdict {
    pub fn is_automatable(&self) -> bool {
        matches!(self, Verdict::Automatable { .. })
    }

    pub fn is_manual_review(&self) -> bool {
        matches!(self, Verdict::ManualReview { .. })
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, Verdict::Excluded { .. })
    }
}

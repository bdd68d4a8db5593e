//! Splicing converted blocks back into document text.

use std::ops::Range;

/// Apply ordered, non-overlapping replacements to the document.
///
/// Each pair is the byte span of a scanned block and its replacement text.
/// Spans must be ascending and within bounds; the scanner guarantees both.
/// Text outside the spans is preserved byte for byte.
pub fn apply(text: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, replacement) in replacements {
        if span.start < cursor || span.end > text.len() {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        out.push_str(replacement);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

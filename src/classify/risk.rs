//! Semantic risk detection for structurally valid blocks.
//!
//! Inspects extracted terms for patterns that make an automatic rewrite
//! low-value or misleading even when the marker structure is sound.

/// Whether a term reads as a semantic placeholder.
///
/// True only for terms written entirely in upper-case letters and
/// underscores, at least three characters long: `PASSWORD`, `MY_BUCKET`,
/// `API_KEY`. Ordinary lower-case identifiers (`name`, `namespace`) are
/// never placeholders, and digits (`SHA256`) suggest a real constant. A
/// definition list keyed by a placeholder is judged low-value without human
/// rewording.
pub fn is_placeholder(term: &str) -> bool {
    term.len() >= 3
        && term.chars().any(|c| c.is_ascii_uppercase())
        && term.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

/// Find a term that appears for more than one marker. Duplicate terms would
/// collide as definition-list keys.
pub fn find_duplicate_term(terms: &[(u32, String)]) -> Option<&str> {
    for (i, (_, term)) in terms.iter().enumerate() {
        if terms[..i].iter().any(|(_, earlier)| earlier == term) {
            return Some(term);
        }
    }
    None
}

//! Term extraction for data-serialization blocks (yaml, yml, json).
//!
//! The line pattern priority is `key: value` -> take `key`. List-item dashes
//! and surrounding quotes are stripped; for dotted paths the deepest nested
//! key name is preferred over the full path (`spec.containers.image` ->
//! `image`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LIST_PREFIX_RE: Regex = Regex::new(r"^[-\s]+").unwrap();
}

/// Extract the key a data-serialization line introduces.
pub fn extract(pre_marker: &str) -> Option<String> {
    let trimmed = pre_marker.trim();
    if trimmed.is_empty() {
        return None;
    }

    // `- name: value` list items name the same key as `name: value`.
    let stripped = LIST_PREFIX_RE.replace(trimmed, "");

    // Take everything before the first colon; a line without a colon is not
    // introducing a key.
    let key = match stripped.find(':') {
        Some(pos) => &stripped[..pos],
        None => return None,
    };

    let key = key
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_start_matches('#')
        .trim();
    if key.is_empty() {
        return None;
    }

    // Deepest path segment over the full path.
    let key = key.rsplit('.').next().unwrap_or(key).trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

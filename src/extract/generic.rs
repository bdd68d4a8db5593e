//! Term extraction for generic text/config blocks.
//!
//! Priority order: `key = value` or `key: value` pairs, then a bracketed
//! `[section]` header, then the first token on the line.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref KV_RE: Regex = Regex::new(r"^([A-Za-z0-9_.-]+)\s*[=:]").unwrap();
    static ref SECTION_RE: Regex = Regex::new(r"^\[([^\]]+)\]").unwrap();
    static ref FIRST_TOKEN_RE: Regex = Regex::new(r"^([A-Za-z0-9_./-]+)").unwrap();
}

/// Longest fallback term taken from the raw line.
const MAX_FALLBACK_LEN: usize = 50;

/// Extract the key, section name, or directive a config line introduces.
pub fn extract(pre_marker: &str) -> Option<String> {
    let line = pre_marker.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(cap) = KV_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = SECTION_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = FIRST_TOKEN_RE.captures(line) {
        return Some(cap[1].to_string());
    }

    let fallback: String = line.chars().take(MAX_FALLBACK_LEN).collect();
    let fallback = fallback.trim().to_string();
    if fallback.is_empty() {
        None
    } else {
        Some(fallback)
    }
}

//! Term extraction for Python blocks.
//!
//! Priority order: `class`/`def` declarations, then the left-hand side of an
//! assignment, then import targets, then a dotted call target, then the
//! first identifier on the line.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CLASS_RE: Regex = Regex::new(r"\bclass\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref DEF_RE: Regex = Regex::new(r"\bdef\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref ASSIGN_RE: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=").unwrap();
    static ref IMPORT_RE: Regex =
        Regex::new(r"(?:from\s+\S+\s+)?import\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref CALL_RE: Regex =
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\(").unwrap();
    static ref IDENT_RE: Regex = Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// Extract the identifier a Python line introduces.
pub fn extract(pre_marker: &str) -> Option<String> {
    let line = pre_marker.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(cap) = CLASS_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = DEF_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = ASSIGN_RE.captures(line) {
        // `x == y` is a comparison, not an assignment.
        let end = cap.get(0).map(|m| m.end()).unwrap_or(0);
        if line.as_bytes().get(end) != Some(&b'=') {
            return Some(cap[1].to_string());
        }
    }
    if let Some(cap) = IMPORT_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = CALL_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    IDENT_RE.captures(line).map(|cap| cap[1].to_string())
}

//! Term extraction for Go blocks.
//!
//! Priority order: `func`/`type`/`var`/`const` declarations, then the
//! left-hand side of a `:=` or `=` assignment, then a struct-literal field
//! name, then an import path's last segment, then a call target, then the
//! first identifier.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FUNC_RE: Regex =
        Regex::new(r"\bfunc\s+(?:\([^)]*\)\s*)?([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref TYPE_RE: Regex = Regex::new(r"\btype\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref VAR_CONST_RE: Regex =
        Regex::new(r"\b(?:var|const)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    static ref SHORT_ASSIGN_RE: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*:=").unwrap();
    static ref ASSIGN_RE: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_.]*)\s*=").unwrap();
    static ref FIELD_RE: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap();
    static ref IMPORT_RE: Regex = Regex::new(r#"\bimport\s+(?:\w+\s+)?"([^"]+)""#).unwrap();
    static ref CALL_RE: Regex =
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\(").unwrap();
    static ref IDENT_RE: Regex = Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// Extract the identifier a Go line introduces.
pub fn extract(pre_marker: &str) -> Option<String> {
    let line = pre_marker.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(cap) = FUNC_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = TYPE_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = VAR_CONST_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = IMPORT_RE.captures(line) {
        let path = &cap[1];
        return path.rsplit('/').next().map(|s| s.to_string());
    }
    if let Some(cap) = SHORT_ASSIGN_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = ASSIGN_RE.captures(line) {
        // `x == y` is a comparison, not an assignment.
        let end = cap.get(0).map(|m| m.end()).unwrap_or(0);
        if line.as_bytes().get(end) != Some(&b'=') {
            return Some(cap[1].to_string());
        }
    }
    if let Some(cap) = FIELD_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    if let Some(cap) = CALL_RE.captures(line) {
        return Some(cap[1].to_string());
    }
    IDENT_RE.captures(line).map(|cap| cap[1].to_string())
}

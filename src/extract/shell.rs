//! Term extraction for shell blocks (bash, sh, shell, terminal, console).
//!
//! Priority order: a `NAME=value` assignment target wins over the leading
//! command token; `--flag=value` yields the flag name; otherwise the first
//! command token. Prompt characters (`$`, `#`) are stripped first.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PROMPT_RE: Regex = Regex::new(r"^[$#]\s*").unwrap();
    /// Assignment target at the start of a token.
    static ref ASSIGN_RE: Regex = Regex::new(r"(?:^|\s)([A-Za-z_][A-Za-z0-9_]*)=").unwrap();
    static ref FLAG_RE: Regex = Regex::new(r"(--?[A-Za-z0-9][A-Za-z0-9_-]*)").unwrap();
    static ref COMMAND_RE: Regex = Regex::new(r"^([A-Za-z0-9_./-]+)").unwrap();
}

/// Extract the command, assignment target, or flag a shell line introduces.
pub fn extract(pre_marker: &str) -> Option<String> {
    let trimmed = pre_marker.trim();
    let stripped = PROMPT_RE.replace(trimmed, "");
    let line = stripped.trim();
    if line.is_empty() {
        return None;
    }

    // Lines that name a flag, like `--namespace=default \`, describe the
    // flag itself; check before the assignment pattern would grab the
    // flag's value form.
    if line.starts_with('-') {
        if let Some(cap) = FLAG_RE.captures(line) {
            return Some(cap[1].to_string());
        }
    }

    // Assignment target preferred over the command: `export LOG_LEVEL=debug`
    // introduces LOG_LEVEL, not export.
    if let Some(cap) = ASSIGN_RE.captures(line) {
        return Some(cap[1].to_string());
    }

    if let Some(cap) = COMMAND_RE.captures(line) {
        return Some(cap[1].to_string());
    }

    // Whatever is left of the line, as-is.
    Some(line.to_string())
}

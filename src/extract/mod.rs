//! Per-dialect term extraction.
//!
//! Contract: given one marked source line and its dialect, return the single
//! term (identifier, key, command name, or declared name) the line most
//! plausibly introduces, or nothing. Extraction never consults lines other
//! than the marked line.
//!
//! The dialect set is closed; dispatch is a plain `match`. Adding a dialect
//! means adding a variant to [`Dialect`] and a strategy module here.

pub mod data;
pub mod generic;
pub mod golang;
pub mod python;
pub mod shell;

use lazy_static::lazy_static;
use regex::Regex;

use crate::scan::Dialect;

lazy_static! {
    static ref COMMENT_ONLY_RE: Regex = Regex::new(r"^[#/]+$").unwrap();
}

/// Text of the line up to its first inline marker.
pub(crate) fn pre_marker(line: &str) -> &str {
    match line.find('<') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Dialect-specific comment prefix used when stripping dangling markers.
pub fn comment_prefix(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Go => "//",
        _ => "#",
    }
}

/// Whether the marked line carries nothing but a comment marker, e.g.
/// `# <1>` in a shell block or `// <2>` in Go. Such lines have no term to
/// extract but remain convertible under the documented synthetic-term policy.
pub fn is_comment_only(line: &str) -> bool {
    let pre = pre_marker(line).trim();
    !pre.is_empty() && COMMENT_ONLY_RE.is_match(pre)
}

/// Extract a term from one marked line via the dialect's strategy.
///
/// Returns `None` for the unknown dialect and for lines with no extractable
/// identifier; callers downgrade the block to manual review in that case.
pub fn extract_term(dialect: Dialect, line: &str) -> Option<String> {
    let pre = pre_marker(line);
    match dialect {
        Dialect::Data => data::extract(pre),
        Dialect::Shell => shell::extract(pre),
        Dialect::Python => python::extract(pre),
        Dialect::Go => golang::extract(pre),
        Dialect::Generic => generic::extract(pre),
        Dialect::Unknown => None,
    }
}

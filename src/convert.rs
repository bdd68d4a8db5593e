//! Rendering of automatable blocks as definition lists.
//!
//! Strips the inline markers from the code, then pairs each extracted term
//! with its trailing explanation in marker order. All-or-nothing per block:
//! any marker that cannot be paired fails the whole conversion.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::extract::comment_prefix;
use crate::scan::{CodeBlock, Dialect};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("no trailing explanation for marker <{0}>")]
    MissingEntry(u32),
    #[error("no term supplied for marker <{0}>")]
    MissingTerm(u32),
}

lazy_static! {
    static ref MARKER_RE: Regex = Regex::new(r"\s*<\d+>").unwrap();
    static ref LIST_ITEM_RE: Regex = Regex::new(r"^\s*[*+-]\s+").unwrap();
}

/// Remove inline markers from one code line.
///
/// A comment token left dangling once its marker is gone is removed too,
/// e.g. `oc apply -f pod.yaml # <1>` loses the whole ` # <1>` tail. Returns
/// `None` when the line held nothing but the marker (and an optional comment
/// token), meaning the line itself should be dropped.
pub fn clean_line(dialect: Dialect, line: &str) -> Option<String> {
    let had_marker = MARKER_RE.is_match(line);
    let mut cleaned = MARKER_RE.replace_all(line, "").trim_end().to_string();

    let prefix = comment_prefix(dialect);
    if had_marker {
        let trimmed = cleaned.trim_end();
        if trimmed.ends_with(prefix) {
            let head = &trimmed[..trimmed.len() - prefix.len()];
            // Only strip when the token stands alone at the end of the line.
            if head.is_empty() || head.ends_with(char::is_whitespace) {
                cleaned = head.trim_end().to_string();
            }
        }
    }

    if had_marker && cleaned.trim().is_empty() {
        return None;
    }
    Some(cleaned)
}

/// Render the replacement text for an automatable block.
///
/// The header and both delimiters are kept verbatim; code lines are cleaned
/// of markers; the trailing marker list becomes a definition list with one
/// `term:: explanation` entry per marker, blank-line separated. Terms are
/// backticked except in data-serialization blocks, where bare keys read
/// better.
pub fn convert_block(block: &CodeBlock, terms: &[(u32, String)]) -> Result<String, ConvertError> {
    let mut out = String::new();
    out.push_str(&block.header);
    out.push('\n');
    out.push_str(&block.delimiter);
    out.push('\n');
    for line in &block.code {
        if let Some(cleaned) = clean_line(block.dialect, line) {
            out.push_str(&cleaned);
            out.push('\n');
        }
    }
    out.push_str(&block.delimiter);
    out.push('\n');
    out.push('\n');

    for (i, number) in block.inline_numbers().into_iter().enumerate() {
        let term = terms
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, t)| t.as_str())
            .ok_or(ConvertError::MissingTerm(number))?;
        let entry = block
            .entries
            .iter()
            .find(|e| e.number == number)
            .ok_or(ConvertError::MissingEntry(number))?;

        if i > 0 {
            out.push('\n');
        }
        if block.dialect == Dialect::Data {
            out.push_str(term);
        } else {
            out.push('`');
            out.push_str(term);
            out.push('`');
        }
        out.push_str(":: ");
        push_explanation(&mut out, &entry.text);
        out.push('\n');
    }

    Ok(out)
}

/// Write a possibly multi-line explanation. Lines after the first rejoin the
/// definition with a `+` continuation unless they are nested list items,
/// which attach directly.
fn push_explanation(out: &mut String, text: &str) {
    for (i, line) in text.lines().enumerate() {
        if i == 0 {
            out.push_str(line);
            continue;
        }
        out.push('\n');
        if !LIST_ITEM_RE.is_match(line) {
            out.push_str("+\n");
        }
        out.push_str(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan_blocks;

    fn block(doc: &str) -> CodeBlock {
        let mut blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        blocks.remove(0)
    }

    #[test]
    fn test_clean_line_strips_marker() {
        assert_eq!(
            clean_line(Dialect::Data, "name: my-pod <1>"),
            Some("name: my-pod".to_string())
        );
        assert_eq!(
            clean_line(Dialect::Data, "no marker"),
            Some("no marker".to_string())
        );
    }

    #[test]
    fn test_clean_line_strips_dangling_comment() {
        assert_eq!(
            clean_line(Dialect::Shell, "oc apply -f pod.yaml # <1>"),
            Some("oc apply -f pod.yaml".to_string())
        );
        assert_eq!(
            clean_line(Dialect::Go, "x := 1 // <2>"),
            Some("x := 1".to_string())
        );
        // A real comment with text keeps its prefix.
        assert_eq!(
            clean_line(Dialect::Shell, "oc apply # wait first <1>"),
            Some("oc apply # wait first".to_string())
        );
    }

    #[test]
    fn test_clean_line_drops_comment_only_line() {
        assert_eq!(clean_line(Dialect::Shell, "# <1>"), None);
        assert_eq!(clean_line(Dialect::Go, "// <1>"), None);
    }

    #[test]
    fn test_convert_yaml_block() {
        let b = block(
            "[source,yaml]\n----\nname: my-pod <1>\nnamespace: default <2>\n----\n\
             <1> Specifies the pod name\n<2> Specifies the namespace\n",
        );
        let terms = vec![(1, "name".to_string()), (2, "namespace".to_string())];
        let out = convert_block(&b, &terms).unwrap();
        assert_eq!(
            out,
            "[source,yaml]\n----\nname: my-pod\nnamespace: default\n----\n\n\
             name:: Specifies the pod name\n\nnamespace:: Specifies the namespace\n"
        );
    }

    #[test]
    fn test_convert_shell_block_backticks_terms() {
        let b = block("[source,bash]\n----\noc get pods <1>\n----\n<1> Lists pods\n");
        let out = convert_block(&b, &[(1, "oc".to_string())]).unwrap();
        assert!(out.contains("`oc`:: Lists pods\n"));
    }

    #[test]
    fn test_convert_multiline_explanation() {
        let b = block(
            "[source,yaml]\n----\nmode: fast <1>\n----\n<1> Choose one of:\n* fast\n* safe\n",
        );
        let out = convert_block(&b, &[(1, "mode".to_string())]).unwrap();
        assert!(out.contains("mode:: Choose one of:\n* fast\n* safe\n"));
    }

    #[test]
    fn test_missing_entry_fails_block() {
        let mut b = block("[source,yaml]\n----\na: 1 <1>\n----\n<1> First\n");
        b.entries.clear();
        assert_eq!(
            convert_block(&b, &[(1, "a".to_string())]),
            Err(ConvertError::MissingEntry(1))
        );
    }

    #[test]
    fn test_missing_term_fails_block() {
        let b = block("[source,yaml]\n----\na: 1 <1>\n----\n<1> First\n");
        assert_eq!(convert_block(&b, &[]), Err(ConvertError::MissingTerm(1)));
    }
}

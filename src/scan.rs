//! Block scanner for fenced source blocks with callout annotations.
//!
//! Walks raw AsciiDoc text and produces [`CodeBlock`] candidates: the fence's
//! declared dialect, the code lines, the inline `<N>` markers attached to
//! them, and the trailing `<N> explanation` list that follows the fence.
//! Pure scan - no side effects, no rewriting.

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Code dialects recognized from the fence header tag.
///
/// The set is closed: adding a dialect means adding a variant here and an
/// extractor strategy in `extract/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Data-serialization formats: yaml, yml, json.
    Data,
    /// Shell-like blocks: bash, sh, shell, terminal, console.
    /// Also the default when the fence declares no language.
    Shell,
    Python,
    Go,
    /// Plain text and config files: text, txt, plaintext, conf, config.
    Generic,
    /// Anything else; always routed to manual review.
    Unknown,
}

/// Fence tag to dialect mapping (lowercase keys).
static DIALECT_TAGS: phf::Map<&'static str, Dialect> = phf_map! {
    "yaml" => Dialect::Data,
    "yml" => Dialect::Data,
    "json" => Dialect::Data,
    "bash" => Dialect::Shell,
    "sh" => Dialect::Shell,
    "shell" => Dialect::Shell,
    "terminal" => Dialect::Shell,
    "console" => Dialect::Shell,
    "python" => Dialect::Python,
    "py" => Dialect::Python,
    "go" => Dialect::Go,
    "golang" => Dialect::Go,
    "text" => Dialect::Generic,
    "txt" => Dialect::Generic,
    "plaintext" => Dialect::Generic,
    "conf" => Dialect::Generic,
    "config" => Dialect::Generic,
};

impl Dialect {
    /// Map a fence tag to a dialect, case-insensitively.
    ///
    /// An empty tag (bare `[source]` or `[subs=...]` blocks) defaults to
    /// shell, matching how documentation teams label terminal snippets.
    pub fn from_tag(tag: &str) -> Dialect {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return Dialect::Shell;
        }
        DIALECT_TAGS.get(tag.as_str()).copied().unwrap_or(Dialect::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Data => "data",
            Dialect::Shell => "shell",
            Dialect::Python => "python",
            Dialect::Go => "go",
            Dialect::Generic => "generic",
            Dialect::Unknown => "unknown",
        }
    }

    /// Whether the dialect is a recognized member of the enumeration.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Dialect::Unknown)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inline `<N>` marker found on a code line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineMarker {
    /// Index into [`CodeBlock::code`].
    pub line: usize,
    pub number: u32,
}

/// One `<N> explanation` entry from the trailing list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutEntry {
    pub number: u32,
    /// Explanation text; may span multiple lines (continuations and nested
    /// list items preserved verbatim).
    pub text: String,
}

/// A scanned callout block candidate.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub dialect: Dialect,
    /// The raw fence tag, kept for diagnostics.
    pub raw_tag: String,
    /// Header line, verbatim (no trailing newline).
    pub header: String,
    /// Opening delimiter line, verbatim.
    pub delimiter: String,
    /// Code lines between the fences.
    pub code: Vec<String>,
    /// Inline markers in document order, one record per occurrence.
    pub markers: Vec<InlineMarker>,
    /// Trailing explanation entries in document order.
    pub entries: Vec<CalloutEntry>,
    /// Byte range in the document from the header through the last consumed
    /// trailing-list line, used by the rewriter.
    pub span: Range<usize>,
    /// 1-based line number of the header, for messages.
    pub start_line: usize,
    /// Trailing region already carries `::` definition-list syntax.
    pub has_deflist: bool,
    /// Block sits inside, or contains, a conditional-inclusion directive.
    pub conditional: bool,
    /// A marker token carried a number too large to represent. Such a block
    /// is never converted; stripping the token would orphan its explanation.
    pub invalid_markers: bool,
}

impl CodeBlock {
    /// Distinct inline marker numbers, sorted ascending.
    pub fn inline_numbers(&self) -> Vec<u32> {
        let mut nums: Vec<u32> = self.markers.iter().map(|m| m.number).collect();
        nums.sort_unstable();
        nums.dedup();
        nums
    }

    /// Distinct trailing entry numbers, sorted ascending.
    pub fn entry_numbers(&self) -> Vec<u32> {
        let mut nums: Vec<u32> = self.entries.iter().map(|e| e.number).collect();
        nums.sort_unstable();
        nums.dedup();
        nums
    }
}

lazy_static! {
    /// Fence header: `[source]`, `[source,tag,...]`, or `[subs=...]`.
    static ref HEADER_RE: Regex =
        Regex::new(r"^\s*\[(?:source(?:\s*,\s*([A-Za-z0-9_-]*))?|subs=)[^\]]*\]\s*$").unwrap();
    /// Fence delimiter: four or more dashes.
    static ref DELIM_RE: Regex = Regex::new(r"^\s*-{4,}\s*$").unwrap();
    /// Inline callout marker.
    static ref MARKER_RE: Regex = Regex::new(r"<(\d+)>").unwrap();
    /// Trailing list entry opener.
    static ref ENTRY_RE: Regex = Regex::new(r"^\s*<(\d+)>\s*(.*)$").unwrap();
    /// AsciiDoc continuation line.
    static ref CONTINUATION_RE: Regex = Regex::new(r"^\s*\+\s*$").unwrap();
    /// Nested list item inside an explanation.
    static ref LIST_ITEM_RE: Regex = Regex::new(r"^\s*[*+-]\s+").unwrap();
    /// Definition-list line (already-converted trailing region).
    static ref DEFLIST_RE: Regex = Regex::new(r"^\S.*?::(\s|$)").unwrap();
    /// Conditional-inclusion open directive (block form, empty brackets).
    static ref COND_OPEN_RE: Regex = Regex::new(r"^(ifdef|ifndef|ifeval)::[^\[]*\[\]\s*$").unwrap();
    static ref COND_CLOSE_RE: Regex = Regex::new(r"^endif::").unwrap();
    static ref COND_ANY_RE: Regex = Regex::new(r"^(ifdef|ifndef|ifeval|endif)::").unwrap();
}

/// A line that ends the trailing list: headings, block attributes, titles,
/// delimiters, and open-block fences.
fn is_structural(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('=')
        || t.starts_with('[')
        || t.starts_with("--")
        || (t.starts_with('.') && t.len() > 1 && !t.starts_with(".."))
        || t.starts_with("..")
}

/// Scan document text for callout block candidates.
///
/// Blocks with zero inline markers are ordinary code blocks and are skipped
/// silently. Blocks are returned in document order with non-overlapping
/// spans.
pub fn scan_blocks(text: &str) -> Vec<CodeBlock> {
    // Line table with byte offsets; newlines preserved for span arithmetic.
    let mut lines: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        lines.push((offset, raw));
        offset += raw.len();
    }
    let text_len = text.len();

    let mut blocks = Vec::new();
    let mut cond_depth: usize = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].1.trim_end_matches(['\n', '\r']);

        if COND_OPEN_RE.is_match(line.trim_start()) {
            cond_depth += 1;
            i += 1;
            continue;
        }
        if COND_CLOSE_RE.is_match(line.trim_start()) {
            cond_depth = cond_depth.saturating_sub(1);
            i += 1;
            continue;
        }

        let header_match = HEADER_RE.captures(line);
        let header_cap = match header_match {
            Some(c) => c,
            None => {
                i += 1;
                continue;
            }
        };
        if i + 1 >= lines.len()
            || !DELIM_RE.is_match(lines[i + 1].1.trim_end_matches(['\n', '\r']))
        {
            i += 1;
            continue;
        }

        // Collect code lines until the closing delimiter.
        let mut close = None;
        let mut code = Vec::new();
        for (j, item) in lines.iter().enumerate().skip(i + 2) {
            let l = item.1.trim_end_matches(['\n', '\r']);
            if DELIM_RE.is_match(l) {
                close = Some(j);
                break;
            }
            code.push(l.to_string());
        }
        let close = match close {
            Some(j) => j,
            None => {
                // Unterminated fence; nothing to convert safely.
                i += 1;
                continue;
            }
        };

        // Inline markers, one record per occurrence.
        let mut markers = Vec::new();
        let mut invalid_markers = false;
        for (idx, code_line) in code.iter().enumerate() {
            for cap in MARKER_RE.captures_iter(code_line) {
                match cap[1].parse::<u32>() {
                    Ok(n) => markers.push(InlineMarker { line: idx, number: n }),
                    Err(_) => invalid_markers = true,
                }
            }
        }
        if markers.is_empty() && !invalid_markers {
            // Ordinary code block.
            i = close + 1;
            continue;
        }

        let (entries, has_deflist, trailing_cond, consumed_to) =
            consume_trailing_list(&lines, close + 1);

        let span_end = if consumed_to > 0 && consumed_to <= lines.len() {
            let (off, raw) = lines[consumed_to - 1];
            off + raw.len()
        } else {
            text_len
        };
        let span_start = lines[i].0;

        let conditional = cond_depth > 0
            || trailing_cond
            || code.iter().any(|l| COND_ANY_RE.is_match(l.trim_start()));

        blocks.push(CodeBlock {
            dialect: Dialect::from_tag(header_cap.get(1).map(|m| m.as_str()).unwrap_or("")),
            raw_tag: header_cap
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            header: line.to_string(),
            delimiter: lines[i + 1].1.trim_end_matches(['\n', '\r']).to_string(),
            code,
            markers,
            entries,
            span: span_start..span_end,
            start_line: i + 1,
            has_deflist,
            conditional,
            invalid_markers,
        });

        i = consumed_to.max(close + 1);
    }

    blocks
}

/// Greedily consume the trailing `<N> explanation` list after a closing fence.
///
/// Entry text continues across plain lines, `+` continuations, and nested
/// list items. A blank line closes the current entry; after a blank, only
/// another entry continues the run. Returns the entries, whether the region
/// opens with `::` definition syntax, whether a conditional directive was
/// seen, and the index one past the last consumed line.
fn consume_trailing_list(
    lines: &[(usize, &str)],
    start: usize,
) -> (Vec<CalloutEntry>, bool, bool, usize) {
    let mut entries: Vec<CalloutEntry> = Vec::new();
    let mut current: Option<(u32, Vec<String>)> = None;
    let mut has_deflist = false;
    let mut conditional = false;
    let mut consumed_to = start;
    let mut k = start;

    // Peek past leading blanks for an already-converted definition list.
    for item in lines.iter().skip(start) {
        let l = item.1.trim_end_matches(['\n', '\r']);
        if l.trim().is_empty() {
            continue;
        }
        if DEFLIST_RE.is_match(l) {
            has_deflist = true;
        }
        break;
    }

    while k < lines.len() {
        let line = lines[k].1.trim_end_matches(['\n', '\r']);
        let blank = line.trim().is_empty();

        if let Some(cap) = ENTRY_RE.captures(line) {
            if let Some((num, text_lines)) = current.take() {
                entries.push(flush_entry(num, text_lines));
            }
            let number: u32 = match cap[1].parse() {
                Ok(n) => n,
                Err(_) => break,
            };
            current = Some((number, vec![cap[2].to_string()]));
            k += 1;
            consumed_to = k;
            continue;
        }

        if COND_ANY_RE.is_match(line.trim_start()) {
            // Conditional directive interleaved with the list; consume it so
            // the exclusion covers the whole region.
            conditional = true;
            k += 1;
            consumed_to = k;
            continue;
        }

        if blank {
            if let Some((num, text_lines)) = current.take() {
                entries.push(flush_entry(num, text_lines));
            }
            // Tolerate the blank only if another entry follows.
            let mut n = k + 1;
            while n < lines.len() && lines[n].1.trim().is_empty() {
                n += 1;
            }
            let continues = n < lines.len() && {
                let next = lines[n].1.trim_end_matches(['\n', '\r']);
                ENTRY_RE.is_match(next) || COND_ANY_RE.is_match(next.trim_start())
            };
            if !continues {
                break;
            }
            k = n;
            continue;
        }

        match current.as_mut() {
            Some((_, text_lines)) => {
                if is_structural(line) {
                    break;
                }
                if CONTINUATION_RE.is_match(line) {
                    // Hard break; the `+` itself is not part of the text.
                    if let Some(last) = text_lines.last_mut() {
                        if !last.trim().is_empty() && !LIST_ITEM_RE.is_match(last) {
                            last.push('\n');
                        }
                    }
                } else {
                    text_lines.push(line.to_string());
                }
                k += 1;
                consumed_to = k;
            }
            None => break,
        }
    }

    if let Some((num, text_lines)) = current.take() {
        entries.push(flush_entry(num, text_lines));
    }

    (entries, has_deflist, conditional, consumed_to)
}

fn flush_entry(number: u32, text_lines: Vec<String>) -> CalloutEntry {
    CalloutEntry {
        number,
        text: text_lines.join("\n").trim().to_string(),
    }
}

//! File collection and per-file safety checks.
//!
//! Recursively gathers `.adoc`/`.asciidoc` files, follows symlinked
//! directories with loop protection, and validates each candidate before it
//! reaches the engine. Also resolves the include graph of assembly files
//! when assembly mode restricts the processing set.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Largest file the engine will read, in bytes.
const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Lines inspected at the top of a file for the assembly content-type marker.
const ASSEMBLY_PROBE_LINES: usize = 20;

/// Why a candidate file was skipped rather than processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[error("symlink")]
    Symlink,
    #[error("empty")]
    Empty,
    #[error("too_large")]
    TooLarge,
    #[error("binary")]
    Binary,
    #[error("no_permission")]
    NoPermission,
    #[error("encoding")]
    Encoding,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Symlink => "symlink",
            SkipReason::Empty => "empty",
            SkipReason::TooLarge => "too_large",
            SkipReason::Binary => "binary",
            SkipReason::NoPermission => "no_permission",
            SkipReason::Encoding => "encoding",
        }
    }
}

fn is_adoc(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("adoc") | Some("asciidoc")
    )
}

/// Skip hidden directories below the walk root. The root itself is exempt
/// so a target directory whose own name starts with `.` still walks, and
/// plain files are never filtered by name.
fn skip_entry(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

/// Collect documentation files under `root`, in sorted order.
///
/// A single file path is returned as-is when it has a matching extension.
/// Symlinked directories are followed; `walkdir` detects link cycles itself
/// and the affected entries are dropped. Hidden directories are skipped.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return if is_adoc(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !skip_entry(e))
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && is_adoc(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Validate and read one candidate in a single pass.
///
/// Symlinked files, empty files, files over the size limit, and files whose
/// first kilobyte contains a NUL byte are skipped with the matching reason.
/// The contents are read exactly once and decoded via [`decode`].
pub fn load_file(path: &Path) -> Result<String, SkipReason> {
    let meta = fs::symlink_metadata(path).map_err(|_| SkipReason::NoPermission)?;
    if meta.file_type().is_symlink() {
        return Err(SkipReason::Symlink);
    }
    if meta.len() == 0 {
        return Err(SkipReason::Empty);
    }
    if meta.len() > MAX_FILE_SIZE {
        return Err(SkipReason::TooLarge);
    }

    let bytes = fs::read(path).map_err(|_| SkipReason::NoPermission)?;
    if bytes.iter().take(1024).any(|&b| b == 0) {
        return Err(SkipReason::Binary);
    }
    Ok(decode(bytes))
}

/// Decode bytes as UTF-8, falling back to a Latin-1 interpretation when the
/// bytes are not valid UTF-8. Latin-1 maps every byte to the code point of
/// the same value, so the fallback cannot fail.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Read a file with the UTF-8 / Latin-1 decoding contract, without the
/// candidate validation. Used by assembly-graph resolution.
pub fn read_with_fallback(path: &Path) -> Result<String, SkipReason> {
    let bytes = fs::read(path).map_err(|_| SkipReason::NoPermission)?;
    Ok(decode(bytes))
}

/// Replace a file's contents atomically.
///
/// Writes to a sibling temp file and renames it over the original, so a
/// failure mid-write leaves the original untouched instead of truncated.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

lazy_static! {
    static ref CONTENT_TYPE_RE: Regex =
        Regex::new(r"^:_mod-docs-content-type:\s*ASSEMBLY\s*$").unwrap();
    static ref INCLUDE_RE: Regex = Regex::new(r"^include::([^\[]+)\[").unwrap();
}

/// Whether the file declares itself an assembly in its leading lines.
pub fn is_assembly(text: &str) -> bool {
    text.lines()
        .take(ASSEMBLY_PROBE_LINES)
        .any(|l| CONTENT_TYPE_RE.is_match(l.trim()))
}

/// Resolve the set of module files reachable from the assemblies among
/// `files` via `include::` directives, recursively.
///
/// Include targets are resolved relative to the including file's directory.
/// Targets that start with an attribute reference (`{attr}/...`) cannot be
/// resolved statically and are skipped. Returns the reachable set, assembly
/// files included.
pub fn assembly_reachable(files: &[PathBuf]) -> HashSet<PathBuf> {
    let mut reachable: HashSet<PathBuf> = HashSet::new();
    let mut queue: Vec<PathBuf> = Vec::new();

    for path in files {
        if let Ok(text) = read_with_fallback(path) {
            if is_assembly(&text) {
                if reachable.insert(path.clone()) {
                    queue.push(path.clone());
                }
            }
        }
    }

    while let Some(path) = queue.pop() {
        let text = match read_with_fallback(&path) {
            Ok(t) => t,
            Err(_) => continue,
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        for line in text.lines() {
            let cap = match INCLUDE_RE.captures(line.trim_start()) {
                Some(c) => c,
                None => continue,
            };
            let target = cap[1].trim();
            if target.starts_with('{') {
                continue;
            }
            let resolved = dir.join(target);
            let resolved = resolved.canonicalize().unwrap_or(resolved);
            if resolved.is_file() && reachable.insert(resolved.clone()) {
                queue.push(resolved);
            }
        }
    }

    reachable
}

//! Calloutconv - AsciiDoc callout to definition-list conversion.
//!
//! Calloutconv rewrites callout-annotated source blocks (`<1>` markers plus
//! a trailing explanation list) into inline definition lists, where each
//! explanation is keyed by a term extracted from the annotated code line.
//! Blocks that cannot be mapped unambiguously and safely are left untouched
//! and reported for manual review with reason tags.
//!
//! # Architecture
//!
//! - `scan`: locates candidate blocks and their markers in document text
//! - `extract`: per-dialect term extraction strategies
//! - `classify`: structural validation, risk detection, per-block verdicts
//! - `convert`: renders an automatable block as a definition list
//! - `rewrite`: splices converted blocks back into the document
//! - `engine`: per-file pipeline and aggregate statistics
//! - `walk`: file collection, safety checks, assembly-mode resolution
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a New Dialect
//!
//! Add a variant to [`scan::Dialect`], map its fence tags in `scan`, and
//! implement a strategy module under `src/extract/`.

pub mod classify;
pub mod cli;
pub mod convert;
pub mod engine;
pub mod extract;
pub mod report;
pub mod rewrite;
pub mod scan;
pub mod walk;

pub use classify::{classify_block, classify_blocks, ReviewReason, Verdict};
pub use convert::{clean_line, convert_block, ConvertError};
pub use engine::{process_file, process_text, FileOutcome, FileReport, Summary};
pub use scan::{scan_blocks, CalloutEntry, CodeBlock, Dialect, InlineMarker};
pub use walk::{collect_files, SkipReason};

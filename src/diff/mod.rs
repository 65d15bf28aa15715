//! Unified diff parsing and pull request classification.
//!
//! This module turns the raw diff of a pull request into a
//! [`ClassificationResult`]:
//! - structural parsing into per-file patches and hunks (`parser`)
//! - classification of a single-file registry diff (`classify`)
//!
//! Only line-level, single-file hunks are of interest; anything else is
//! reported as [`RequestKind::Other`].

mod classify;
mod helpers;
mod parser;


// Re-export public API
pub use classify::{
    ClassificationResult, NO_NEWLINE_MARKER, NO_NEWLINE_MESSAGE, RequestKind, classify,
};
pub use parser::{DiffHunk, FilePatch, parse_multi_file_diff};

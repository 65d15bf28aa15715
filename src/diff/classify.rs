//! Classification of a pull request diff against the registry file.

use crate::error::{GateError, Result};
use log::debug;
use serde::Serialize;

use super::helpers::strip_vcs_prefix;
use super::parser::parse_multi_file_diff;

/// Marker emitted by git when a file in the patch lacks a trailing newline.
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// Message shown when a pull request removes the final newline of a file.
pub const NO_NEWLINE_MESSAGE: &str = "Pull request removes newline from the end of a file.%0APlease add a blank line to the end of the file.";

/// What a pull request does to the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Unrelated to the registry (or touches nothing in it).
    #[default]
    Other,
    /// Structurally unacceptable; see the accompanying error.
    Invalid,
    /// Adds registry lines only.
    Submission,
    /// Removes registry lines only.
    Removal,
    /// Adds and removes registry lines.
    Modification,
}

/// Outcome of classifying a pull request diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub kind: RequestKind,
    /// User-facing error (only set for `Invalid`).
    pub error: String,
    /// Argument for the linter's library manager setting.
    pub lint_setting: String,
    /// Added registry lines, in diff order. Empty unless kind is
    /// `Submission` or `Modification`.
    pub added_urls: Vec<String>,
}

impl ClassificationResult {
    fn other() -> Self {
        Self::of_kind(RequestKind::Other, "")
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Self::of_kind(RequestKind::Invalid, "")
        }
    }

    fn of_kind(kind: RequestKind, lint_setting: &str) -> Self {
        Self {
            kind,
            error: String::new(),
            lint_setting: lint_setting.to_string(),
            added_urls: Vec::new(),
        }
    }
}

/// Classify a pull request diff against the registry file `target_filename`.
///
/// The no-newline marker check is textual and runs before any parsing, so it
/// rejects the diff even when the marker belongs to an unrelated file.
///
/// # Returns
///
/// * `Ok(ClassificationResult)` - The classification and the added lines
/// * `Err(GateError::InputError)` - The diff is not valid UTF-8 or is malformed
pub fn classify(raw_diff: &[u8], target_filename: &str) -> Result<ClassificationResult> {
    let marker = NO_NEWLINE_MARKER.as_bytes();
    if raw_diff.windows(marker.len()).any(|window| window == marker) {
        debug!("diff contains the no-newline marker");
        return Ok(ClassificationResult::invalid(NO_NEWLINE_MESSAGE));
    }

    let text = std::str::from_utf8(raw_diff)
        .map_err(|e| GateError::InputError(format!("diff is not valid UTF-8: {}", e)))?;
    let patches = parse_multi_file_diff(text)?;

    let [patch] = patches.as_slice() else {
        debug!("diff touches {} files; not a registry request", patches.len());
        return Ok(ClassificationResult::other());
    };

    let orig = strip_vcs_prefix(&patch.orig_name);
    let new = strip_vcs_prefix(&patch.new_name);
    if orig != Some(target_filename) || new != Some(target_filename) {
        debug!(
            "diff touches '{}' -> '{}'; not a registry request",
            patch.orig_name, patch.new_name
        );
        return Ok(ClassificationResult::other());
    }

    let mut added_urls = Vec::new();
    let mut removed_count = 0usize;
    for line in patch.hunks.iter().flat_map(|hunk| hunk.body.iter()) {
        let line = line.trim_end_matches([' ', '\t']);
        // Also drops '+'/'-' lines with no content.
        if line.len() < 2 {
            continue;
        }

        if let Some(url) = line.strip_prefix('+') {
            added_urls.push(url.trim().to_string());
        } else if line.starts_with('-') {
            removed_count += 1;
        }
    }

    let result = match (added_urls.is_empty(), removed_count == 0) {
        (true, true) => ClassificationResult::other(),
        (false, true) => ClassificationResult {
            added_urls,
            ..ClassificationResult::of_kind(RequestKind::Submission, "submit")
        },
        (true, false) => ClassificationResult::of_kind(RequestKind::Removal, ""),
        (false, false) => ClassificationResult {
            added_urls,
            ..ClassificationResult::of_kind(RequestKind::Modification, "update")
        },
    };

    debug!(
        "classified registry diff as {:?} ({} added, {} removed)",
        result.kind,
        result.added_urls.len(),
        removed_count
    );
    Ok(result)
}

//! Helper functions for diff parsing.

use regex::Regex;
use std::sync::LazyLock;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("Invalid hunk header regex")
});

/// Line ranges declared by a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct HunkRange {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
}

/// Parse the old and new file names from a "diff --git" line.
///
/// Handles:
/// - "a/path/to/file b/path/to/file" (normal)
/// - "a/path/to/file b/path/to/renamed" (rename)
///
/// Names keep their `a/` and `b/` prefixes. Returns None if no " b/"
/// separator is present.
pub(super) fn parse_diff_git_line(rest: &str) -> Option<(String, String)> {
    // Paths can contain spaces, so split on the last " b/" occurrence.
    let b_pos = rest.rfind(" b/")?;
    let orig = rest.get(..b_pos)?;
    let new = rest.get(b_pos + 1..)?;
    Some((orig.to_string(), new.to_string()))
}

/// Extract the file name from a "---" or "+++" header line body.
///
/// Some diff producers append a tab and a timestamp after the name.
pub(super) fn parse_file_header_name(rest: &str) -> String {
    match rest.split_once('\t') {
        Some((name, _)) => name.to_string(),
        None => rest.trim_end().to_string(),
    }
}

/// Parse a hunk header line.
///
/// Format: "@@ -old_start,old_len +new_start,new_len @@" or "@@ -old_start +new_start @@",
/// optionally followed by section context. An omitted length means 1.
pub(super) fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let caps = HUNK_HEADER.captures(line)?;
    let number = |index: usize| -> Option<usize> {
        match caps.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };

    Some(HunkRange {
        old_start: number(1)?,
        old_lines: number(2)?,
        new_start: number(3)?,
        new_lines: number(4)?,
    })
}

/// Strip the two character VCS prefix (`a/`, `b/`) from a patch file name.
///
/// Returns None for names too short to carry a prefix.
pub(crate) fn strip_vcs_prefix(name: &str) -> Option<&str> {
    name.get(2..)
}

//! Core diff parsing logic.

use crate::error::{GateError, Result};

use super::helpers::{parse_diff_git_line, parse_file_header_name, parse_hunk_header};

/// One `@@ ... @@` block of a file's diff.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffHunk {
    /// First line of the hunk in the original file.
    pub old_start: usize,
    /// Number of original-file lines covered by the hunk.
    pub old_lines: usize,
    /// First line of the hunk in the new file.
    pub new_start: usize,
    /// Number of new-file lines covered by the hunk.
    pub new_lines: usize,
    /// The raw body lines, including their leading ' ', '+' or '-' marker.
    pub body: Vec<String>,
}

/// The diff of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilePatch {
    /// Original file name, with its VCS prefix (e.g. `a/repositories.txt`).
    pub orig_name: String,
    /// New file name, with its VCS prefix (e.g. `b/repositories.txt`).
    pub new_name: String,
    /// Hunks in the order they appear.
    pub hunks: Vec<DiffHunk>,
}

/// A hunk being read, with the number of lines its header still expects.
struct OpenHunk {
    hunk: DiffHunk,
    old_remaining: usize,
    new_remaining: usize,
}

impl OpenHunk {
    fn is_complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    /// Consume one body line, checking it against the declared ranges.
    fn push(&mut self, line: &str, line_number: usize) -> Result<()> {
        let (old, new) = match line.as_bytes().first() {
            None | Some(b' ') => (1, 1),
            Some(b'-') => (1, 0),
            Some(b'+') => (0, 1),
            Some(b'\\') => (0, 0),
            Some(_) => {
                return Err(malformed(
                    line_number,
                    format!("unexpected line inside hunk: '{}'", line),
                ));
            }
        };

        if old > self.old_remaining || new > self.new_remaining {
            return Err(malformed(
                line_number,
                "hunk has more lines than its header declares",
            ));
        }

        self.old_remaining -= old;
        self.new_remaining -= new;
        self.hunk.body.push(line.to_string());
        Ok(())
    }
}

/// Parse a unified diff of zero or more files into per-file patches.
///
/// Accepts both `git diff` output (with "diff --git" headers and extended
/// header lines) and plain unified diffs that start each file with "---".
/// Hunk bodies are delimited by the line counts in their headers, so a
/// removed line whose content begins with "--" is never mistaken for a
/// file header.
///
/// # Returns
///
/// * `Ok(Vec<FilePatch>)` - Patches in input order (empty for an empty diff)
/// * `Err(GateError::InputError)` - The diff is structurally malformed
pub fn parse_multi_file_diff(diff: &str) -> Result<Vec<FilePatch>> {
    let mut patches: Vec<FilePatch> = Vec::new();
    let mut current: Option<FilePatch> = None;
    let mut orig_header_seen = false;
    let mut open: Option<OpenHunk> = None;

    for (index, line) in diff.lines().enumerate() {
        let line_number = index + 1;

        if let Some(hunk) = open.as_mut() {
            hunk.push(line, line_number)?;
            if hunk.is_complete() {
                close_hunk(&mut current, open.take());
            }
            continue;
        }

        // Format: "diff --git a/path/to/file b/path/to/file"
        if let Some(rest) = line.strip_prefix("diff --git ") {
            let (orig_name, new_name) = parse_diff_git_line(rest).ok_or_else(|| {
                malformed(line_number, format!("unparseable file header: '{}'", line))
            })?;
            patches.extend(current.take());
            current = Some(FilePatch {
                orig_name,
                new_name,
                hunks: Vec::new(),
            });
            orig_header_seen = false;
            continue;
        }

        // Format: "--- a/path/to/file" or "--- /dev/null"
        if let Some(rest) = line.strip_prefix("--- ") {
            let name = parse_file_header_name(rest);
            match current.as_mut() {
                Some(patch) if !orig_header_seen && patch.hunks.is_empty() => {
                    patch.orig_name = name;
                }
                _ => {
                    // Plain unified diff without "diff --git" lines.
                    patches.extend(current.take());
                    current = Some(FilePatch {
                        orig_name: name,
                        ..FilePatch::default()
                    });
                }
            }
            orig_header_seen = true;
            continue;
        }

        // Format: "+++ b/path/to/file" or "+++ /dev/null"
        if let Some(rest) = line.strip_prefix("+++ ") {
            match current.as_mut() {
                Some(patch) if orig_header_seen && patch.hunks.is_empty() => {
                    patch.new_name = parse_file_header_name(rest);
                }
                _ => {
                    return Err(malformed(
                        line_number,
                        "'+++' header without a preceding '---' header",
                    ));
                }
            }
            continue;
        }

        if line.starts_with("@@") {
            if current.is_none() {
                return Err(malformed(line_number, "hunk found before any file header"));
            }
            let range = parse_hunk_header(line).ok_or_else(|| {
                malformed(line_number, format!("invalid hunk header: '{}'", line))
            })?;
            let hunk = OpenHunk {
                hunk: DiffHunk {
                    old_start: range.old_start,
                    old_lines: range.old_lines,
                    new_start: range.new_start,
                    new_lines: range.new_lines,
                    body: Vec::new(),
                },
                old_remaining: range.old_lines,
                new_remaining: range.new_lines,
            };
            if hunk.is_complete() {
                close_hunk(&mut current, Some(hunk));
            } else {
                open = Some(hunk);
            }
            continue;
        }

        // "\ No newline at end of file" after a completed hunk belongs to it.
        if line.starts_with('\\') {
            if let Some(hunk) = current.as_mut().and_then(|patch| patch.hunks.last_mut()) {
                hunk.body.push(line.to_string());
            }
            continue;
        }

        // Extended headers (index, mode, rename, similarity), preamble and
        // blank separator lines carry nothing we need.
    }

    if open.is_some() {
        return Err(GateError::InputError(
            "malformed diff: input ends inside a hunk".to_string(),
        ));
    }

    patches.extend(current.take());
    Ok(patches)
}

fn close_hunk(current: &mut Option<FilePatch>, hunk: Option<OpenHunk>) {
    if let (Some(patch), Some(hunk)) = (current.as_mut(), hunk) {
        patch.hunks.push(hunk.hunk);
    }
}

fn malformed(line_number: usize, detail: impl std::fmt::Display) -> GateError {
    GateError::InputError(format!("malformed diff at line {}: {}", line_number, detail))
}

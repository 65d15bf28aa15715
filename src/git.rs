//! Git command runner for registry-gate.
//!
//! Provides a wrapper around git commands with captured stdout/stderr and
//! structured error handling, plus the repository operations the submission
//! checks need. Every operation takes an explicit working directory; the
//! process working directory is never changed.

use crate::error::{GateError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    /// Create a new GitOutput from raw output bytes.
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Launch git and capture its output, whatever the exit status.
///
/// Terminal prompts are disabled so that a private or missing repository
/// fails instead of waiting for credentials.
fn spawn_git(cwd: &Path, args: &[&str]) -> Result<Output> {
    debug!("git {} (in {})", args.join(" "), cwd.display());
    Command::new("git")
        .current_dir(cwd)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| {
            GateError::GitError(format!(
                "failed to execute git {}: {} (is git installed?)",
                args.first().unwrap_or(&""),
                e
            ))
        })
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(GateError::GitError)` - On launch failure or non-zero exit code
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = spawn_git(cwd.as_ref(), args)?;
    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(GateError::GitError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Run a git command and report whether it exited cleanly.
///
/// A non-zero exit is `Ok(false)`; only a launch failure is an error.
pub fn git_succeeds<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<bool> {
    let output = spawn_git(cwd.as_ref(), args)?;
    if !output.status.success() {
        debug!(
            "git {} exited with {:?}: {}",
            args.first().unwrap_or(&""),
            output.status.code(),
            GitOutput::from_output(&output).stderr
        );
    }
    Ok(output.status.success())
}

/// Repository operations needed to inspect a submitted library.
///
/// The subprocess implementation is [`GitCli`]; tests substitute fakes.
pub trait RepositoryOps {
    /// Whether `url` answers as a Git remote.
    ///
    /// A remote that is reachable but not a Git repository is `Ok(false)`.
    fn is_git_remote(&self, url: &str) -> Result<bool>;

    /// Shallow-clone `url` into the existing, empty directory `dest`.
    fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()>;

    /// Fetch all tags in `repo` and return the most recent reachable tag.
    fn latest_tag(&self, repo: &Path) -> Result<Option<String>>;

    /// Check out `reference` in `repo`.
    fn checkout(&self, repo: &Path, reference: &str) -> Result<()>;
}

/// [`RepositoryOps`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Working directory for commands that need no repository.
    scratch_dir: PathBuf,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryOps for GitCli {
    fn is_git_remote(&self, url: &str) -> Result<bool> {
        git_succeeds(&self.scratch_dir, &["ls-remote", url])
    }

    fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        run_git(&self.scratch_dir, &["clone", "--depth", "1", url, &dest])?;
        Ok(())
    }

    fn latest_tag(&self, repo: &Path) -> Result<Option<String>> {
        run_git(repo, &["fetch", "--tags"])?;

        let tagged = run_git(repo, &["rev-list", "--tags", "--max-count=1"])?;
        if tagged.is_empty() {
            return Ok(None);
        }

        let described = run_git(repo, &["describe", "--tags", &tagged.stdout])?;
        Ok(Some(described.stdout))
    }

    fn checkout(&self, repo: &Path, reference: &str) -> Result<()> {
        run_git(repo, &["checkout", reference])?;
        Ok(())
    }
}

use crate::error::{GateError, Result};
use crate::git::{GitCli, RepositoryOps};
use crate::http::{Reachability, ReachabilityProbe};
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Builder for a local library repository used as a clone source in tests.
pub(crate) struct LibraryRepo {
    name: String,
    tag: Option<String>,
    metadata: Option<String>,
}

impl LibraryRepo {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tag: None,
            metadata: Some(format!("name={}\nversion=1.0.0\n", name)),
        }
    }

    /// Tag the last commit.
    pub(crate) fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// Replace the `library.properties` content; `None` leaves the file out.
    pub(crate) fn metadata(mut self, content: Option<&str>) -> Self {
        self.metadata = content.map(str::to_string);
        self
    }

    pub(crate) fn create(self) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path();

        git(path, &["init"]);
        // Deterministic default branch name across environments.
        git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(path, &["config", "user.email", "test@example.com"]);
        git(path, &["config", "user.name", "Test User"]);

        std::fs::write(path.join("README.md"), format!("# {}\n", self.name)).unwrap();
        if let Some(metadata) = &self.metadata {
            std::fs::write(path.join("library.properties"), metadata).unwrap();
        }
        git(path, &["add", "."]);
        git(path, &["commit", "-m", "Initial commit"]);

        if let Some(tag) = &self.tag {
            git(path, &["tag", tag]);
        }

        temp_dir
    }
}

/// `file://` URL of a local path, usable as a clone source.
pub(crate) fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Probe answering from a table; unknown absolute URLs are reachable as is.
#[derive(Default)]
pub(crate) struct FakeProbe {
    responses: HashMap<String, Reachability>,
}

impl FakeProbe {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, url: &str, outcome: Reachability) -> Self {
        self.responses.insert(url.to_string(), outcome);
        self
    }

    /// `url` redirects to `final_url`.
    pub(crate) fn redirect(self, url: &str, final_url: &str) -> Self {
        self.respond(
            url,
            Reachability::Reachable {
                final_url: final_url.to_string(),
            },
        )
    }
}

impl ReachabilityProbe for FakeProbe {
    fn probe(&self, url: &str) -> Reachability {
        if let Some(outcome) = self.responses.get(url) {
            return outcome.clone();
        }
        if url.contains("://") {
            Reachability::Reachable {
                final_url: url.to_string(),
            }
        } else {
            Reachability::Failed(format!("unsupported protocol scheme in \"{}\"", url))
        }
    }
}

/// Repository operations that map remote URLs to local repositories.
///
/// Cloning, tag lookup and checkout run the real git executable against the
/// local copies.
#[derive(Default)]
pub(crate) struct FakeRemotes {
    repos: HashMap<String, TempDir>,
}

impl FakeRemotes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `repo` at the normalized URL `url`.
    pub(crate) fn serve(mut self, url: &str, repo: LibraryRepo) -> Self {
        self.repos.insert(url.to_string(), repo.create());
        self
    }
}

impl RepositoryOps for FakeRemotes {
    fn is_git_remote(&self, url: &str) -> Result<bool> {
        Ok(self.repos.contains_key(url))
    }

    fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()> {
        let repo = self
            .repos
            .get(url)
            .ok_or_else(|| GateError::GitError(format!("no such remote: {}", url)))?;
        GitCli::new().shallow_clone(&file_url(repo.path()), dest)
    }

    fn latest_tag(&self, repo: &Path) -> Result<Option<String>> {
        GitCli::new().latest_tag(repo)
    }

    fn checkout(&self, repo: &Path, reference: &str) -> Result<()> {
        GitCli::new().checkout(repo, reference)
    }
}

/// Repository operations whose tool cannot be launched.
pub(crate) struct MissingGit;

impl RepositoryOps for MissingGit {
    fn is_git_remote(&self, _url: &str) -> Result<bool> {
        Err(GateError::GitError(
            "failed to execute git ls-remote: No such file or directory (is git installed?)"
                .to_string(),
        ))
    }

    fn shallow_clone(&self, _url: &str, _dest: &Path) -> Result<()> {
        Err(GateError::GitError("failed to execute git clone".to_string()))
    }

    fn latest_tag(&self, _repo: &Path) -> Result<Option<String>> {
        Err(GateError::GitError("failed to execute git fetch".to_string()))
    }

    fn checkout(&self, _repo: &Path, _reference: &str) -> Result<()> {
        Err(GateError::GitError("failed to execute git checkout".to_string()))
    }
}

fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}

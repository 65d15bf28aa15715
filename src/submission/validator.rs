//! The staged submission validator.

use crate::access::{AccessEntry, AccessLevel, owner_denial, owner_revoked_message};
use crate::config::Config;
use crate::error::GateError;
use crate::git::RepositoryOps;
use crate::http::{Reachability, ReachabilityProbe};
use crate::properties::Properties;
use crate::registry::Registry;
use crate::registry_url::{NormalizedUrl, ParsedUrl, is_under, normalize};
use log::{debug, info};
use std::path::Path;
use tempfile::TempDir;

use super::types::{
    INDEX_SEPARATOR, LibraryType, Rejection, StageError, SubmissionRecord, Validation,
};

const REQUIREMENTS_URL: &str = "https://github.com/arduino/library-registry/blob/main/FAQ.md#what-are-the-requirements-for-a-library-to-be-added-to-library-manager";
const METADATA_SPEC_URL: &str =
    "https://arduino.github.io/arduino-cli/latest/library-specification/#library-metadata";

type StageResult<T> = std::result::Result<T, StageError>;

/// Read-only inputs shared by every candidate of a request.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext<'a> {
    pub config: &'a Config,
    pub access_list: &'a [AccessEntry],
    pub registry: &'a Registry,
    pub submitter_access: AccessLevel,
}

/// Runs the validation stages for one candidate URL at a time.
///
/// Candidates are independent: each gets its own record and its own clone
/// directory, and nothing is shared between calls except the read-only
/// context.
pub struct SubmissionValidator<'a> {
    context: SubmissionContext<'a>,
    probe: &'a dyn ReachabilityProbe,
    git: &'a dyn RepositoryOps,
}

impl<'a> SubmissionValidator<'a> {
    pub fn new(
        context: SubmissionContext<'a>,
        probe: &'a dyn ReachabilityProbe,
        git: &'a dyn RepositoryOps,
    ) -> Self {
        Self {
            context,
            probe,
            git,
        }
    }

    /// Validate one candidate URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Validation)` - The record (possibly carrying an error), the
    ///   index entry (empty on failure) and whether the candidate is allowed
    /// * `Err(GateError)` - An environment fault that aborts the run
    pub fn validate(&self, raw_url: &str) -> crate::error::Result<Validation> {
        let mut record = SubmissionRecord::new(raw_url);

        match self.run_stages(raw_url, &mut record) {
            Ok(index_entry) => {
                info!("submission {} passed: {}", raw_url, index_entry);
                Ok(Validation {
                    record,
                    index_entry,
                    allowed: true,
                })
            }
            Err(StageError::Rejected(rejection)) => {
                info!("submission {} rejected: {}", raw_url, rejection.message);
                record.fail(rejection.message);
                Ok(Validation {
                    record,
                    index_entry: String::new(),
                    allowed: !rejection.decline,
                })
            }
            Err(StageError::Fatal(err)) => Err(err),
        }
    }

    fn run_stages(&self, raw_url: &str, record: &mut SubmissionRecord) -> StageResult<String> {
        let submitted = parse_submission(raw_url)?;
        let resolved = self.check_reachable(&submitted)?;

        // Everything from here on uses the post-redirect URL.
        let normalized = normalize(&resolved);
        record.normalized_url = normalized.to_string();
        debug!("{} normalized to {}", raw_url, normalized);

        self.check_owner_access(&normalized)?;
        self.check_supported_host(&normalized)?;
        self.check_git_remote(&normalized)?;
        record.repository_name = normalized.repository_name().to_string();

        self.check_not_registered(&submitted, &normalized)?;

        let types = self.library_types(&normalized);
        record.official = types.contains(&LibraryType::Arduino);

        let clone_dir = TempDir::new().map_err(|e| {
            GateError::IoError(format!("failed to create clone directory: {}", e))
        })?;
        self.git
            .shallow_clone(&normalized.to_string(), clone_dir.path())?;

        record.tag = self.checkout_latest_tag(clone_dir.path())?;
        record.name = self.library_name(clone_dir.path())?;

        Ok(index_entry(&normalized, &types, &record.name))
    }

    fn check_reachable(&self, submitted: &ParsedUrl) -> StageResult<ParsedUrl> {
        match self.probe.probe(&submitted.to_string()) {
            Reachability::Reachable { final_url } => ParsedUrl::parse(&final_url)
                .map_err(|e| Rejection::fixable(format!("Invalid submission URL ({})", e)).into()),
            Reachability::Status(status) => {
                debug!("{} answered with status {}", submitted, status);
                Err(Rejection::fixable(
                    "Unable to load submission URL. Is the repository public?",
                )
                .into())
            }
            Reachability::Failed(reason) => Err(Rejection::fixable(format!(
                "Unable to load submission URL: {}",
                reason
            ))
            .into()),
        }
    }

    fn check_owner_access(&self, normalized: &NormalizedUrl) -> StageResult<()> {
        // Allowed submitters may register repositories of denied owners.
        if self.context.submitter_access == AccessLevel::Allow {
            return Ok(());
        }

        match owner_denial(self.context.access_list, normalized) {
            Some(entry) => Err(Rejection::declining(owner_revoked_message(entry)).into()),
            None => Ok(()),
        }
    }

    fn check_supported_host(&self, normalized: &NormalizedUrl) -> StageResult<()> {
        if is_under(normalized, self.context.config.supported_hosts.as_slice()) {
            return Ok(());
        }

        Err(Rejection::fixable(format!(
            "`{}` is not currently supported as a Git hosting website for Library Manager.%0A%0ASee: {}",
            normalized.host, REQUIREMENTS_URL
        ))
        .into())
    }

    fn check_git_remote(&self, normalized: &NormalizedUrl) -> StageResult<()> {
        if self.git.is_git_remote(&normalized.to_string())? {
            return Ok(());
        }

        Err(Rejection::fixable(
            "Submission URL is not a Git clone URL (e.g., `https://github.com/arduino-libraries/Servo`).",
        )
        .into())
    }

    fn check_not_registered(
        &self,
        submitted: &ParsedUrl,
        normalized: &NormalizedUrl,
    ) -> StageResult<()> {
        if !self.context.registry.contains(normalized) {
            return Ok(());
        }

        let message = if normalize(submitted) == *normalized {
            "Submission URL is already in the Library Manager index.".to_string()
        } else {
            format!(
                "Resolved URL {} is already in the Library Manager index.",
                normalized
            )
        };
        Err(Rejection::fixable(message).into())
    }

    fn library_types(&self, normalized: &NormalizedUrl) -> Vec<LibraryType> {
        let config = self.context.config;
        let organizations = [
            (LibraryType::Arduino, &config.official_organizations),
            (LibraryType::Partner, &config.partner_organizations),
            (LibraryType::Recommended, &config.recommended_organizations),
        ];

        let mut types: Vec<LibraryType> = organizations
            .into_iter()
            .filter(|(_, prefixes)| is_under(normalized, prefixes.as_slice()))
            .map(|(library_type, _)| library_type)
            .collect();
        if types.is_empty() {
            types.push(LibraryType::Contributed);
        }
        types
    }

    fn checkout_latest_tag(&self, clone_dir: &Path) -> StageResult<String> {
        let Some(tag) = self.git.latest_tag(clone_dir)? else {
            return Err(Rejection::fixable(format!(
                "The repository has no tags. You need to create a [release](https://docs.github.com/en/github/administering-a-repository/managing-releases-in-a-repository) or [tag](https://git-scm.com/docs/git-tag) that matches the `version` value in the library's {} file.",
                self.context.config.metadata_file
            ))
            .into());
        };

        self.git.checkout(clone_dir, &tag)?;
        Ok(tag)
    }

    fn library_name(&self, clone_dir: &Path) -> StageResult<String> {
        let file = &self.context.config.metadata_file;
        let path = clone_dir.join(file);
        if !path.is_file() {
            return Err(Rejection::fixable(format!(
                "Library is missing a {} metadata file.%0A%0ASee: {}",
                file, METADATA_SPEC_URL
            ))
            .into());
        }

        let properties = Properties::load(&path).map_err(|e| {
            Rejection::fixable(format!(
                "Invalid {} file: {}%0A%0ASee: {}",
                file, e, METADATA_SPEC_URL
            ))
        })?;

        match properties.get("name") {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(Rejection::fixable(format!(
                "{} is missing a name field.%0A%0ASee: {}",
                file, METADATA_SPEC_URL
            ))
            .into()),
        }
    }
}

fn parse_submission(raw_url: &str) -> StageResult<ParsedUrl> {
    ParsedUrl::parse(raw_url)
        .map_err(|e| Rejection::fixable(format!("Invalid submission URL ({})", e)).into())
}

/// Assemble `url|types|name`.
fn index_entry(normalized: &NormalizedUrl, types: &[LibraryType], name: &str) -> String {
    let types: Vec<&str> = types.iter().map(LibraryType::as_str).collect();
    [normalized.to_string(), types.join(","), name.to_string()].join(INDEX_SEPARATOR)
}

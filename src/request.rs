//! Request assembly: turns a pull request into the JSON report.
//!
//! The assembler resolves the submitter's access level, classifies the
//! diff, validates every candidate URL in diff order and aggregates the
//! per-candidate outcomes into a single [`Request`].

use crate::access::{
    AccessEntry, AccessLevel, find_submitter_entry, submitter_access, submitter_revoked_message,
};
use crate::config::Config;
use crate::diff::{RequestKind, classify};
use crate::error::{GateError, Result};
use crate::git::RepositoryOps;
use crate::http::ReachabilityProbe;
use crate::registry::Registry;
use crate::submission::{SubmissionContext, SubmissionRecord, SubmissionValidator, Validation};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;

/// Line break in every value consumed by the workflow.
pub const LINE_BREAK: &str = "%0A";

const DECLINED: &str = "declined";
const DUPLICATE_MESSAGE: &str = "Submission contains duplicate URLs.";

/// The report printed for one pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// `"declined"` or empty.
    pub conclusion: String,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub arduino_lint_library_manager_setting: String,
    /// `None` when the request carries no candidates.
    pub submissions: Option<Vec<SubmissionRecord>>,
    pub index_entry: String,
    #[serde(rename = "indexerLogsURLs")]
    pub indexer_logs_urls: String,
    pub error: String,
}

impl Request {
    pub fn is_declined(&self) -> bool {
        self.conclusion == DECLINED
    }

    /// Render as a single JSON line.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| GateError::IoError(format!("failed to serialize request: {}", e)))
    }
}

/// Everything a request is judged against.
pub struct RequestAssembler<'a> {
    pub config: &'a Config,
    pub access_list: &'a [AccessEntry],
    pub registry: &'a Registry,
    pub probe: &'a dyn ReachabilityProbe,
    pub git: &'a dyn RepositoryOps,
}

impl RequestAssembler<'_> {
    /// Build the report for a pull request by `submitter`.
    ///
    /// `read_diff` is only called when the submitter is not denied.
    /// `target_filename` is the registry file name the diff must touch.
    pub fn assemble<F>(&self, submitter: &str, target_filename: &str, read_diff: F) -> Result<Request>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let submitter_access =
            submitter_access(self.access_list, &self.config.main_host, submitter);
        if submitter_access == AccessLevel::Deny {
            info!("submitter @{} is denied", submitter);
            return Ok(self.declined_submitter(submitter));
        }

        let raw_diff = read_diff()?;
        let classification = classify(&raw_diff, target_filename)?;
        debug!(
            "request classified as {:?} with {} candidate(s)",
            classification.kind,
            classification.added_urls.len()
        );

        let mut request = Request {
            kind: classification.kind,
            arduino_lint_library_manager_setting: classification.lint_setting,
            error: classification.error,
            ..Request::default()
        };
        if classification.added_urls.is_empty() {
            return Ok(request);
        }

        let context = SubmissionContext {
            config: self.config,
            access_list: self.access_list,
            registry: self.registry,
            submitter_access,
        };
        let validator = SubmissionValidator::new(context, self.probe, self.git);
        let mut validations = classification
            .added_urls
            .iter()
            .map(|url| validator.validate(url))
            .collect::<Result<Vec<_>>>()?;

        if !validations.iter().any(|validation| validation.allowed) {
            request.conclusion = DECLINED.to_string();
        }
        mark_duplicates(&mut validations);

        let indexer_logs_urls: Vec<String> = validations
            .iter()
            .map(|v| indexer_logs_url(&self.config.indexer_logs_base, &v.record.normalized_url))
            .collect();
        let index_entries: Vec<&str> = validations
            .iter()
            .map(|v| v.index_entry.as_str())
            .collect();

        request.index_entry = index_entries.join(LINE_BREAK);
        request.indexer_logs_urls = indexer_logs_urls.join(LINE_BREAK);
        request.submissions = Some(validations.into_iter().map(|v| v.record).collect());
        Ok(request)
    }

    fn declined_submitter(&self, submitter: &str) -> Request {
        let error = find_submitter_entry(self.access_list, &self.config.main_host, submitter)
            .map(|entry| submitter_revoked_message(submitter, entry))
            .unwrap_or_default();
        Request {
            conclusion: DECLINED.to_string(),
            kind: RequestKind::Invalid,
            error,
            ..Request::default()
        }
    }
}

/// Fail every candidate whose normalized URL repeats an earlier one.
///
/// Candidates that never got a normalized URL are not compared. A repeated
/// candidate also loses its index entry.
fn mark_duplicates(validations: &mut [Validation]) {
    let mut seen = HashSet::new();
    for validation in validations.iter_mut() {
        let url = validation.record.normalized_url.clone();
        if url.is_empty() || seen.insert(url) {
            continue;
        }

        debug!("{} repeats an earlier candidate", validation.record.submission_url);
        validation.record.fail(DUPLICATE_MESSAGE);
        validation.index_entry.clear();
    }
}

/// Where the indexer publishes logs for a library.
///
/// `http://downloads.arduino.cc/libraries/logs/github.com/foo/Bar/` for
/// `https://github.com/foo/Bar.git`.
pub fn indexer_logs_url(base: &str, normalized_url: &str) -> String {
    let without_scheme = normalized_url
        .split_once("://")
        .map_or(normalized_url, |(_, rest)| rest);
    let without_suffix = without_scheme
        .strip_suffix(crate::registry_url::GIT_SUFFIX)
        .unwrap_or(without_scheme);
    format!("{}/{}/", base.trim_end_matches('/'), without_suffix)
}

//! Core types for submission records and stage outcomes.

use crate::error::GateError;
use serde::Serialize;

/// Delimiter between the fields of a registry index entry.
pub const INDEX_SEPARATOR: &str = "|";

/// Data gathered on one submitted library.
///
/// Fields fill in as stages pass. Once `error` is set it is never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// URL as submitted, used to identify the submission to the user.
    #[serde(rename = "submissionURL")]
    pub submission_url: String,
    /// Resolved URL in the standardized registry form.
    #[serde(rename = "normalizedURL")]
    pub normalized_url: String,
    pub repository_name: String,
    /// Library name declared in the metadata file.
    pub name: String,
    /// Whether the library comes from an official organization.
    pub official: bool,
    /// Latest tag, the basis for the index entry.
    pub tag: String,
    pub error: String,
}

impl SubmissionRecord {
    pub fn new(submission_url: impl Into<String>) -> Self {
        Self {
            submission_url: submission_url.into(),
            ..Self::default()
        }
    }

    /// Record an error unless one is already present.
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.is_failed() {
            self.error = message.into();
        }
    }

    pub fn is_failed(&self) -> bool {
        !self.error.is_empty()
    }
}

/// A record-local failure the submitter can correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub message: String,
    /// Whether the failure counts against the whole request.
    pub decline: bool,
}

impl Rejection {
    /// A failure confined to this submission.
    pub fn fixable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            decline: false,
        }
    }

    /// A failure that makes the submission decline-worthy.
    pub fn declining(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            decline: true,
        }
    }
}

/// Why a stage stopped.
#[derive(Debug)]
pub enum StageError {
    /// The candidate failed; siblings carry on.
    Rejected(Rejection),
    /// The environment failed; the run aborts.
    Fatal(GateError),
}

impl From<Rejection> for StageError {
    fn from(rejection: Rejection) -> Self {
        StageError::Rejected(rejection)
    }
}

impl From<GateError> for StageError {
    fn from(err: GateError) -> Self {
        StageError::Fatal(err)
    }
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub record: SubmissionRecord,
    /// Registry index entry; empty unless every stage passed.
    pub index_entry: String,
    /// False when the candidate failed with a decline-worthy error.
    pub allowed: bool,
}

/// Library type attributes recorded in the index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryType {
    Arduino,
    Partner,
    Recommended,
    Contributed,
}

impl LibraryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryType::Arduino => "Arduino",
            LibraryType::Partner => "Partner",
            LibraryType::Recommended => "Recommended",
            LibraryType::Contributed => "Contributed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_never_clears_or_replaces_error() {
        let mut record = SubmissionRecord::new("https://github.com/foo/bar");
        assert!(!record.is_failed());

        record.fail("first");
        record.fail("second");
        record.fail("");
        assert_eq!(record.error, "first");
        assert!(record.is_failed());
    }

    #[test]
    fn record_serializes_with_report_keys() {
        let record = SubmissionRecord::new("https://github.com/foo/bar");
        let json = serde_json::to_value(&record).unwrap();
        for key in [
            "submissionURL",
            "normalizedURL",
            "repositoryName",
            "name",
            "official",
            "tag",
            "error",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn rejection_constructors() {
        assert!(!Rejection::fixable("x").decline);
        assert!(Rejection::declining("x").decline);
    }
}

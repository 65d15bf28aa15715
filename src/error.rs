//! Error types for the registry-gate CLI.
//!
//! Only run-fatal faults are errors. Problems a submitter can fix are
//! carried on the submission record instead (see `submission::Rejection`).

use crate::exit_codes;
use thiserror::Error;

/// Run-fatal error for a gate invocation.
///
/// Each variant maps to a specific exit code. No request report is printed
/// when one of these reaches `main`.
#[derive(Error, Debug)]
pub enum GateError {
    /// Bad arguments or missing input files.
    #[error("{0}")]
    UserError(String),

    /// Structurally corrupt input (diff, access list, config, registry).
    #[error("{0}")]
    InputError(String),

    /// Git could not be launched, or a required repository operation failed.
    #[error("git operation failed: {0}")]
    GitError(String),

    /// Filesystem or temporary directory failure.
    #[error("I/O failure: {0}")]
    IoError(String),

    /// The HTTP client could not be used at all.
    #[error("HTTP failure: {0}")]
    HttpError(String),
}

impl GateError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GateError::UserError(_) => exit_codes::USER_ERROR,
            GateError::InputError(_) => exit_codes::INPUT_ERROR,
            GateError::GitError(_) => exit_codes::GIT_FAILURE,
            GateError::IoError(_) | GateError::HttpError(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = GateError::UserError("--diffpath flag is required".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn input_error_has_correct_exit_code() {
        let err = GateError::InputError("malformed hunk header".to_string());
        assert_eq!(err.exit_code(), exit_codes::INPUT_ERROR);
    }

    #[test]
    fn git_error_has_correct_exit_code() {
        let err = GateError::GitError("clone failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
    }

    #[test]
    fn io_and_http_errors_share_exit_code() {
        let io = GateError::IoError("tempdir".to_string());
        let http = GateError::HttpError("tls".to_string());
        assert_eq!(io.exit_code(), exit_codes::IO_FAILURE);
        assert_eq!(http.exit_code(), exit_codes::IO_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = GateError::GitError("git clone failed (exit code 128)".to_string());
        assert_eq!(
            err.to_string(),
            "git operation failed: git clone failed (exit code 128)"
        );

        let err = GateError::UserError("diff file not found".to_string());
        assert_eq!(err.to_string(), "diff file not found");
    }
}

//! Validation of submitted library repositories.
//!
//! Each candidate URL runs through an ordered series of stages. A stage
//! either hands a value to the next one or stops the candidate with a
//! [`Rejection`] that is recorded on its [`SubmissionRecord`]. Environment
//! faults (git missing, clone failure, temp directory failure) abort the
//! whole run instead.

mod types;
mod validator;


// Re-export public API
pub use types::{
    INDEX_SEPARATOR, LibraryType, Rejection, StageError, SubmissionRecord, Validation,
};
pub use validator::{SubmissionContext, SubmissionValidator};

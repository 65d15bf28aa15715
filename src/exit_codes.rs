//! Exit code constants for the registry-gate CLI.
//!
//! Record-local validation failures are reported inside the JSON request
//! and still exit with `SUCCESS`. The other codes are reserved for faults
//! that abort the whole run:
//! - 0: Success (a report was printed)
//! - 1: User error (bad flags, missing input files)
//! - 2: Input error (malformed diff, access list, config or registry)
//! - 3: Git failure (git missing or a required repository operation failed)
//! - 4: I/O failure (filesystem, temporary directories, HTTP client setup)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or missing input files.
pub const USER_ERROR: i32 = 1;

/// Input error: structurally corrupt diff, YAML or registry content.
pub const INPUT_ERROR: i32 = 2;

/// Git failure: tool launch failure or clone/fetch/describe/checkout failure.
pub const GIT_FAILURE: i32 = 3;

/// I/O failure: filesystem or environment problems.
pub const IO_FAILURE: i32 = 4;

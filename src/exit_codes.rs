//! Exit code constants for the barc CLI.
//!
//! - 0: Success (every selected branch processed)
//! - 1: User error (bad args, bad config, confirmation refused)
//! - 2: Operation failure (batch vetoed, or one or more branches failed)
//! - 3: External API failure (hosting API unreachable or rejected a batch-level call)
//! - 4: Authentication failure (missing or rejected credential)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or refused confirmation.
pub const USER_ERROR: i32 = 1;

/// Operation failure: tag collision veto, default-branch guard, or per-branch failures.
pub const OPERATION_FAILURE: i32 = 2;

/// External API failure: the hosting API failed outside of a per-branch pipeline.
pub const API_FAILURE: i32 = 3;

/// Authentication failure: no credential, or the hosting API rejected it.
pub const AUTH_FAILURE: i32 = 4;

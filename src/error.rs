//! Error types for barc.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Per-branch failures never surface as `BarcError` from a batch run; they are
//! captured into that branch's outcome. The variants here are what a single
//! client call, a preflight check, or a whole command can fail with.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for barc operations.
#[derive(Error, Debug)]
pub enum BarcError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// A referenced branch ref does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An archive tag already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// Preflight found archive tags that already exist; nothing was mutated.
    #[error("Cannot process: Tags already exist for branches: {}", .branches.join(", "))]
    BatchVetoed {
        /// Branches whose archive tag already exists, in request order.
        branches: Vec<String>,
    },

    /// Preflight could not confirm that an archive tag is absent.
    #[error("Cannot process: tag check failed for branch {branch}: {reason}")]
    PreflightFailed {
        /// Branch whose tag probe failed.
        branch: String,
        /// Why the probe failed.
        reason: String,
    },

    /// The operation would touch a branch this tool refuses to touch.
    #[error("{0}")]
    ProtectedOperation(String),

    /// The hosting API returned a non-success response or could not be reached.
    #[error("{message}")]
    ExternalApi {
        /// HTTP status, if a response was received at all.
        status: Option<u16>,
        /// Human readable description including the upstream reason.
        message: String,
    },

    /// Missing or rejected credential.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The batch was cancelled before it could complete preflight.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// A batch ran to completion but some branches failed.
    #[error("{0} branch operation(s) failed")]
    BranchFailures(usize),
}

impl BarcError {
    /// Build an `ExternalApi` error for a response with the given status.
    pub fn upstream(status: u16, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let message = if reason.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, reason)
        };
        BarcError::ExternalApi {
            status: Some(status),
            message,
        }
    }

    /// Build an `ExternalApi` error for a call that produced no response.
    pub fn transport(message: impl Into<String>) -> Self {
        BarcError::ExternalApi {
            status: None,
            message: message.into(),
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            BarcError::UserError(_) => exit_codes::USER_ERROR,
            BarcError::Cancelled(_) => exit_codes::USER_ERROR,
            BarcError::NotFound(_) => exit_codes::API_FAILURE,
            BarcError::AlreadyExists(_) => exit_codes::OPERATION_FAILURE,
            BarcError::BatchVetoed { .. } => exit_codes::OPERATION_FAILURE,
            BarcError::ProtectedOperation(_) => exit_codes::OPERATION_FAILURE,
            BarcError::BranchFailures(_) => exit_codes::OPERATION_FAILURE,
            BarcError::PreflightFailed { .. } => exit_codes::API_FAILURE,
            BarcError::ExternalApi { .. } => exit_codes::API_FAILURE,
            BarcError::Auth(_) => exit_codes::AUTH_FAILURE,
        }
    }
}

/// Result type alias for barc operations.
pub type Result<T> = std::result::Result<T, BarcError>;

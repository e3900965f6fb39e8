//! The batch entry point's request and response shapes.
//!
//! Wire format:
//! - request:  `{"branches": ["feature-x", "main"], "operation": "archive-and-delete"}`
//! - response: `{"results": [BranchOperationOutcome, ...]}`

use super::mode::OperationMode;
use super::outcome::{BatchResult, BranchOperationOutcome};
use crate::error::{BarcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An immutable description of one batch: which branches, which mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    branches: Vec<String>,
    operation: OperationMode,
}

impl BatchRequest {
    pub fn new(branches: Vec<String>, operation: OperationMode) -> Self {
        Self {
            branches,
            operation,
        }
    }

    /// Target branches, in the order outcomes will be reported.
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn operation(&self) -> OperationMode {
        self.operation
    }

    /// Check the request is runnable: at least one branch, no blank or
    /// repeated names.
    pub fn validate(&self) -> Result<()> {
        if self.branches.is_empty() {
            return Err(BarcError::UserError("no branches selected".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.branches.len());
        for branch in &self.branches {
            if branch.trim().is_empty() {
                return Err(BarcError::UserError(
                    "branch names must be non-empty".to_string(),
                ));
            }
            if !seen.insert(branch.as_str()) {
                return Err(BarcError::UserError(format!(
                    "branch '{}' is listed more than once",
                    branch
                )));
            }
        }

        Ok(())
    }
}

/// Body returned by the batch entry point when at least one pipeline ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<BranchOperationOutcome>,
}

impl From<BatchResult> for BatchResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            results: result.into_outcomes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::names;

    #[test]
    fn test_parse_wire_request() {
        let request: BatchRequest = serde_json::from_str(
            r#"{"branches": ["feature-x", "main"], "operation": "archive-and-delete"}"#,
        )
        .unwrap();
        assert_eq!(request.branches(), ["feature-x", "main"]);
        assert_eq!(request.operation(), OperationMode::ArchiveAndDelete);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_operation_is_rejected_by_serde() {
        let parsed: std::result::Result<BatchRequest, _> =
            serde_json::from_str(r#"{"branches": ["a"], "operation": "archive"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicates() {
        let empty = BatchRequest::new(Vec::new(), OperationMode::ArchiveOnly);
        assert!(empty.validate().unwrap_err().to_string().contains("no branches"));

        let dup = BatchRequest::new(names(&["a", "b", "a"]), OperationMode::DeleteOnly);
        assert!(dup.validate().unwrap_err().to_string().contains("more than once"));

        let blank = BatchRequest::new(names(&["a", " "]), OperationMode::DeleteOnly);
        assert!(blank.validate().is_err());
    }
}

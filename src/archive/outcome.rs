//! Per-branch outcomes and batch results.

use super::mode::OperationMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to one branch in one batch run.
///
/// Built exactly once by the pipeline (through [`OutcomeRecorder`]) and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchOperationOutcome {
    branch: String,
    operation: OperationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag_name: Option<String>,
    tag_created: bool,
    branch_deleted: bool,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BranchOperationOutcome {
    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn operation(&self) -> OperationMode {
        self.operation
    }

    /// Archive tag targeted by this run, when the mode tags.
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    pub fn tag_created(&self) -> bool {
        self.tag_created
    }

    pub fn branch_deleted(&self) -> bool {
        self.branch_deleted
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Failure reason; `None` exactly when `success()` is true.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Tracks the checkpoints one pipeline reaches and seals them into an outcome.
#[derive(Debug)]
pub(crate) struct OutcomeRecorder {
    branch: String,
    operation: OperationMode,
    tag_name: Option<String>,
    tag_created: bool,
    branch_deleted: bool,
}

impl OutcomeRecorder {
    pub(crate) fn new(branch: impl Into<String>, operation: OperationMode) -> Self {
        Self {
            branch: branch.into(),
            operation,
            tag_name: None,
            tag_created: false,
            branch_deleted: false,
        }
    }

    pub(crate) fn set_tag_name(&mut self, tag: impl Into<String>) {
        debug_assert!(self.operation.creates_tag());
        self.tag_name = Some(tag.into());
    }

    pub(crate) fn mark_tagged(&mut self) {
        debug_assert!(self.operation.creates_tag());
        self.tag_created = true;
    }

    pub(crate) fn mark_deleted(&mut self) {
        debug_assert!(self.operation.deletes_branch());
        self.branch_deleted = true;
    }

    pub(crate) fn succeed(self) -> BranchOperationOutcome {
        self.seal(None)
    }

    pub(crate) fn fail(self, error: impl Into<String>) -> BranchOperationOutcome {
        self.seal(Some(error.into()))
    }

    fn seal(self, error: Option<String>) -> BranchOperationOutcome {
        BranchOperationOutcome {
            branch: self.branch,
            operation: self.operation,
            tag_name: self.tag_name,
            tag_created: self.tag_created,
            branch_deleted: self.branch_deleted,
            success: error.is_none(),
            error,
        }
    }
}

/// Outcomes of one batch, in request order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(rename = "results")]
    outcomes: Vec<BranchOperationOutcome>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl BatchResult {
    pub(crate) fn new(
        outcomes: Vec<BranchOperationOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            outcomes,
            started_at,
            finished_at,
        }
    }

    pub fn outcomes(&self) -> &[BranchOperationOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<BranchOperationOutcome> {
        self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Wall-clock time the batch took, in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

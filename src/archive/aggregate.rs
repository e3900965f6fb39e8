//! Result Aggregator: turns a [`BatchResult`] into what the operator sees.

use super::outcome::{BatchResult, BranchOperationOutcome};
use crate::selection::{Branch, WorkingSet};
use serde::Serialize;

/// Human-readable label for what a successful outcome did.
pub fn action_label(outcome: &BranchOperationOutcome) -> &'static str {
    match (outcome.tag_created(), outcome.branch_deleted()) {
        (true, true) => "archived and deleted",
        (true, false) => "archived",
        _ => "deleted",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Succeeded {
    pub branch: String,
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failed {
    pub branch: String,
    pub error: String,
}

/// Successes and failures of one batch, each in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub successes: Vec<Succeeded>,
    pub failures: Vec<Failed>,
}

impl Summary {
    pub fn from_result(result: &BatchResult) -> Self {
        let mut summary = Self::default();
        for outcome in result.outcomes() {
            if outcome.success() {
                summary.successes.push(Succeeded {
                    branch: outcome.branch().to_string(),
                    action: action_label(outcome),
                });
            } else {
                summary.failures.push(Failed {
                    branch: outcome.branch().to_string(),
                    error: outcome.error().unwrap_or("unknown error").to_string(),
                });
            }
        }
        summary
    }

    /// `Successfully processed: a (archived), b (deleted)`, or `None` when
    /// nothing succeeded.
    pub fn success_message(&self) -> Option<String> {
        if self.successes.is_empty() {
            return None;
        }
        let items: Vec<String> = self
            .successes
            .iter()
            .map(|s| format!("{} ({})", s.branch, s.action))
            .collect();
        Some(format!("Successfully processed: {}", items.join(", ")))
    }

    /// `Failed operations: c (reason)`, or `None` when nothing failed.
    pub fn failure_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let items: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{} ({})", f.branch, f.error))
            .collect();
        Some(format!("Failed operations: {}", items.join(", ")))
    }
}

/// Update the operator's working set after a batch.
///
/// Branches the batch deleted are dropped. Everything else, failures
/// included, stays in its original position. All selection marks are
/// cleared. Returns the remaining branches.
pub fn apply_to_selection(set: &mut WorkingSet, result: &BatchResult) -> Vec<Branch> {
    let deleted: Vec<&str> = result
        .outcomes()
        .iter()
        .filter(|o| o.branch_deleted())
        .map(|o| o.branch())
        .collect();
    set.retain_and_clear(|b| !deleted.contains(&b.name.as_str()));
    set.branches().to_vec()
}

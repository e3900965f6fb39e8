//! Branch Operation Pipeline.
//!
//! Runs the step sequence for exactly one branch and always yields exactly
//! one [`BranchOperationOutcome`]:
//!
//! ```text
//! READ_REF -> [tags]    CHECK_TAG -> CREATE_TAG -> TAGGED
//!          -> [deletes] CHECK_DEFAULT -> DELETE -> DELETED
//!          -> SUCCESS
//! ```
//!
//! Any failed step ends this branch's run only. Nothing is compensated: a tag
//! created before a failed delete stays, and the outcome reports the partial
//! progress.

use super::mode::OperationMode;
use super::naming::tag_name_for;
use super::outcome::{BranchOperationOutcome, OutcomeRecorder};
use crate::context::RepoId;
use crate::error::BarcError;
use crate::github::RefClient;
use tracing::{Instrument, debug, info_span, warn};

/// Run every step `mode` implies for `branch`.
///
/// Never fails: every error is captured in the returned outcome.
pub async fn run_pipeline(
    client: &dyn RefClient,
    repo: &RepoId,
    branch: &str,
    mode: OperationMode,
) -> BranchOperationOutcome {
    let span = info_span!("branch", branch = %branch, mode = %mode);

    async move {
        let mut recorder = OutcomeRecorder::new(branch, mode);
        match run_steps(client, repo, branch, mode, &mut recorder).await {
            Ok(()) => {
                debug!("branch processed");
                recorder.succeed()
            }
            Err(failure) => {
                let reason = failure.message(branch);
                warn!(step = ?failure.step, %reason, "branch operation failed");
                recorder.fail(reason)
            }
        }
    }
    .instrument(span)
    .await
}

/// The pipeline step a branch stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    ReadRef,
    CheckTag,
    CreateTag,
    CheckDefault,
    Delete,
}

impl Step {
    fn failure_prefix(self) -> &'static str {
        match self {
            Step::ReadRef => "Failed to read branch",
            Step::CheckTag => "Failed to check tag",
            Step::CreateTag => "Failed to create tag",
            Step::CheckDefault => "Failed to fetch repository details",
            Step::Delete => "Failed to delete branch",
        }
    }
}

#[derive(Debug)]
struct StepFailure {
    step: Step,
    error: BarcError,
}

impl StepFailure {
    fn at(step: Step) -> impl FnOnce(BarcError) -> StepFailure {
        move |error| StepFailure { step, error }
    }

    /// The outcome message for this failure.
    fn message(&self, branch: &str) -> String {
        match (self.step, &self.error) {
            (_, BarcError::AlreadyExists(msg) | BarcError::ProtectedOperation(msg)) => msg.clone(),
            (Step::ReadRef, BarcError::NotFound(_)) => format!("Branch not found: {}", branch),
            (step, error) => format!("{}: {}", step.failure_prefix(), error),
        }
    }
}

async fn run_steps(
    client: &dyn RefClient,
    repo: &RepoId,
    branch: &str,
    mode: OperationMode,
    recorder: &mut OutcomeRecorder,
) -> Result<(), StepFailure> {
    let sha = client
        .read_branch_ref(repo, branch)
        .await
        .map_err(StepFailure::at(Step::ReadRef))?;
    debug!(%sha, "read branch ref");

    if mode.creates_tag() {
        let tag = tag_name_for(branch);
        recorder.set_tag_name(tag.clone());

        // Re-checked here even after a passing preflight; another actor may
        // have created the tag in between.
        let exists = client
            .tag_ref_exists(repo, &tag)
            .await
            .map_err(StepFailure::at(Step::CheckTag))?;
        if exists {
            return Err(StepFailure::at(Step::CheckTag)(BarcError::AlreadyExists(
                format!("Tag {} already exists", tag),
            )));
        }

        client
            .create_tag_ref(repo, &tag, &sha)
            .await
            .map_err(StepFailure::at(Step::CreateTag))?;
        recorder.mark_tagged();
        debug!(%tag, "created archive tag");
    }

    if mode.deletes_branch() {
        let default_branch = client
            .get_default_branch(repo)
            .await
            .map_err(StepFailure::at(Step::CheckDefault))?;
        if default_branch == branch {
            return Err(StepFailure::at(Step::CheckDefault)(
                BarcError::ProtectedOperation("Cannot delete default branch".to_string()),
            ));
        }

        client
            .delete_branch_ref(repo, branch)
            .await
            .map_err(StepFailure::at(Step::Delete))?;
        recorder.mark_deleted();
        debug!("deleted branch");
    }

    Ok(())
}

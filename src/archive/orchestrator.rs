//! Batch Orchestrator.
//!
//! Given a [`BatchRequest`], the orchestrator:
//! 1. validates the request and checks the credential once against the
//!    repository, so a rejected token fails the batch before any branch work,
//! 2. for tagging modes, probes every archive tag up front and vetoes the whole
//!    batch if any already exists (or cannot be confirmed absent),
//! 3. runs one pipeline per branch with at most `max_concurrency` in flight,
//! 4. collects every outcome and returns them in request order.
//!
//! Branch pipelines share nothing but the read-only client. One branch failing,
//! being slow, or panicking never affects another branch's outcome.

use super::naming::{find_tag_collisions, tag_name_for};
use super::outcome::{BatchResult, BranchOperationOutcome, OutcomeRecorder};
use super::pipeline::run_pipeline;
use super::request::BatchRequest;
use crate::context::RepoId;
use crate::error::{BarcError, Result};
use crate::github::{RefClient, TagProbe};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome message for branches skipped after cancellation.
pub const CANCELLED_BEFORE_START: &str = "Cancelled before start";

/// Default cap on concurrent branch pipelines and preflight probes.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Tuning for one orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Maximum pipelines (or preflight probes) running at once. Values below 1 are treated as 1.
    pub max_concurrency: usize,
    /// When cancelled, no further probes or pipelines are started.
    pub cancel: Option<CancellationToken>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            cancel: None,
        }
    }
}

/// Runs batches against one hosting API client.
pub struct Orchestrator {
    client: Arc<dyn RefClient>,
    options: OrchestratorOptions,
}

enum Slot<T> {
    Started(JoinHandle<T>),
    NotStarted,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn RefClient>, options: OrchestratorOptions) -> Self {
        Self { client, options }
    }

    /// Run a whole batch.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchResult)` - Every branch was attempted (or skipped on cancellation);
    ///   individual failures live in the outcomes
    /// * `Err(BarcError::UserError)` - The request is empty or repeats a branch
    /// * `Err(BarcError::BatchVetoed)` - An archive tag already exists; nothing was mutated
    /// * `Err(BarcError::PreflightFailed)` - A tag could not be confirmed absent
    /// * `Err(BarcError::Auth)` - The token was rejected before any branch work
    /// * `Err(BarcError::Cancelled)` - Cancelled before any pipeline started
    pub async fn run(&self, repo: &RepoId, request: &BatchRequest) -> Result<BatchResult> {
        request.validate()?;
        let mode = request.operation();
        let started_at = Utc::now();

        info!(
            repo = %repo,
            mode = %mode,
            branches = request.branches().len(),
            "starting batch"
        );

        if self.is_cancelled() {
            return Err(BarcError::Cancelled(
                "batch cancelled before it started; nothing was changed".to_string(),
            ));
        }
        self.verify_access(repo).await?;

        if mode.creates_tag() {
            for collision in find_tag_collisions(request.branches()) {
                warn!(
                    tag = %collision.tag,
                    branches = %collision.branches.join(", "),
                    "branches share an archive tag name; only one of them can be archived"
                );
            }
            self.preflight(repo, request.branches()).await?;
        }

        let outcomes = self.run_pipelines(repo, request).await?;
        let result = BatchResult::new(outcomes, started_at, Utc::now());

        info!(
            repo = %repo,
            succeeded = result.len() - result.failure_count(),
            failed = result.failure_count(),
            "batch finished"
        );
        Ok(result)
    }

    /// One repository read with the batch's credential. A rejected token
    /// surfaces here as `Auth` instead of as one failed outcome per branch.
    async fn verify_access(&self, repo: &RepoId) -> Result<()> {
        match self.client.get_default_branch(repo).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(repo = %repo, error = %e, "repository check failed; batch not started");
                Err(e)
            }
        }
    }

    /// Probe every branch's archive tag concurrently; veto on any collision.
    pub async fn preflight(&self, repo: &RepoId, branches: &[String]) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut slots = Vec::with_capacity(branches.len());

        for branch in branches {
            let Some(permit) = self.acquire(&semaphore).await else {
                slots.push(Slot::NotStarted);
                continue;
            };
            let client = Arc::clone(&self.client);
            let repo = repo.clone();
            let tag = tag_name_for(branch);
            slots.push(Slot::Started(tokio::spawn(async move {
                let _permit = permit;
                client.probe_tag_ref(&repo, &tag).await
            })));
        }

        let mut existing = Vec::new();
        let mut first_failure: Option<(String, BarcError)> = None;

        for (branch, slot) in branches.iter().zip(slots) {
            let probe = match slot {
                Slot::Started(handle) => match handle.await {
                    Ok(probe) => probe,
                    Err(join_err) => Err(BarcError::transport(format!(
                        "tag check aborted: {}",
                        join_err
                    ))),
                },
                Slot::NotStarted => {
                    return Err(BarcError::Cancelled(
                        "batch cancelled during tag checks; nothing was changed".to_string(),
                    ));
                }
            };

            match probe {
                Ok(TagProbe::Absent) => {}
                Ok(TagProbe::Exists) => existing.push(branch.clone()),
                Err(BarcError::Auth(msg)) => return Err(BarcError::Auth(msg)),
                Err(e) => {
                    if first_failure.is_none() {
                        first_failure = Some((branch.clone(), e));
                    }
                }
            }
        }

        if !existing.is_empty() {
            warn!(branches = %existing.join(", "), "archive tags already exist; batch vetoed");
            return Err(BarcError::BatchVetoed { branches: existing });
        }

        if let Some((branch, e)) = first_failure {
            warn!(%branch, error = %e, "tag check failed; batch vetoed");
            return Err(BarcError::PreflightFailed {
                branch,
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    async fn run_pipelines(
        &self,
        repo: &RepoId,
        request: &BatchRequest,
    ) -> Result<Vec<BranchOperationOutcome>> {
        let mode = request.operation();
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut slots = Vec::with_capacity(request.branches().len());

        for branch in request.branches() {
            let Some(permit) = self.acquire(&semaphore).await else {
                slots.push(Slot::NotStarted);
                continue;
            };
            let client = Arc::clone(&self.client);
            let repo = repo.clone();
            let branch = branch.clone();
            slots.push(Slot::Started(tokio::spawn(async move {
                let _permit = permit;
                run_pipeline(client.as_ref(), &repo, &branch, mode).await
            })));
        }

        if slots.iter().all(|slot| matches!(slot, Slot::NotStarted)) {
            return Err(BarcError::Cancelled(
                "batch cancelled before any branch started; nothing was changed".to_string(),
            ));
        }

        let mut outcomes = Vec::with_capacity(slots.len());
        for (branch, slot) in request.branches().iter().zip(slots) {
            let outcome = match slot {
                Slot::Started(handle) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(join_err) => {
                        warn!(%branch, error = %join_err, "branch pipeline aborted");
                        OutcomeRecorder::new(branch.as_str(), mode)
                            .fail(format!("Pipeline aborted: {}", join_err))
                    }
                },
                Slot::NotStarted => {
                    OutcomeRecorder::new(branch.as_str(), mode).fail(CANCELLED_BEFORE_START)
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Wait for a free slot, or give up once the batch is cancelled.
    async fn acquire(&self, semaphore: &Arc<Semaphore>) -> Option<OwnedSemaphorePermit> {
        match &self.options.cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return None;
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    permit = Arc::clone(semaphore).acquire_owned() => permit.ok(),
                }
            }
            None => Arc::clone(semaphore).acquire_owned().await.ok(),
        }
    }
}

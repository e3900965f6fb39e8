//! Implementation of the `barc archive` command.
//!
//! Flow:
//! 1. List the repository's branches and resolve the selection
//! 2. `--dry-run`: print the plan and stop
//! 3. Destructive modes: pass the confirmation gate (`--confirm` or a prompt)
//! 4. Run the batch; ctrl-c stops new branches from starting
//! 5. Print the summary; exit non-zero if any branch failed

mod display;


use super::Session;
use crate::archive::{
    BatchResult, ConfirmationGate, OperationMode, Orchestrator, OrchestratorOptions, Prompt,
    StdinPrompt, TagCollision, apply_to_selection, find_tag_collisions, tag_name_for,
};
use crate::cli::ArchiveArgs;
use crate::error::{BarcError, Result};
use crate::github::RefClient;
use crate::selection::{Branch, WorkingSet, resolve_selection};
use display::{print_plan, print_result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// What a batch would do, before anything is mutated.
#[derive(Debug, Clone)]
pub struct ArchivePlan {
    pub mode: OperationMode,
    /// Target branches with the tag each would get (when the mode tags).
    pub targets: Vec<(String, Option<String>)>,
    pub collisions: Vec<TagCollision>,
}

impl ArchivePlan {
    fn new(mode: OperationMode, branches: &[String]) -> Self {
        let targets = branches
            .iter()
            .map(|b| (b.clone(), mode.creates_tag().then(|| tag_name_for(b))))
            .collect();
        let collisions = if mode.creates_tag() {
            find_tag_collisions(branches)
        } else {
            Vec::new()
        };
        Self {
            mode,
            targets,
            collisions,
        }
    }

    pub fn branches(&self) -> Vec<String> {
        self.targets.iter().map(|(b, _)| b.clone()).collect()
    }
}

/// What running the command produced.
#[derive(Debug)]
pub enum ArchiveReport {
    DryRun(ArchivePlan),
    Ran {
        plan: ArchivePlan,
        result: BatchResult,
        /// Branches left after removing the deleted ones.
        remaining: Vec<Branch>,
    },
}

/// Execute the `barc archive` command.
pub async fn cmd_archive(session: &Session, args: ArchiveArgs) -> Result<()> {
    let client = session.client()?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted: letting running branches finish, starting no more.");
                cancel.cancel();
            }
        })
    };

    let options = OrchestratorOptions {
        max_concurrency: session.config.max_concurrency,
        cancel: Some(cancel),
    };
    let report = run_archive(client, &args, &mut StdinPrompt, options).await;
    watcher.abort();

    match report? {
        ArchiveReport::DryRun(plan) => {
            print_plan(&args.repo, &plan);
            println!();
            println!("Dry-run mode: no changes made.");
            Ok(())
        }
        ArchiveReport::Ran {
            plan,
            result,
            remaining,
        } => {
            print_result(&args, &plan, &result, &remaining)?;
            match result.failure_count() {
                0 => Ok(()),
                n => Err(BarcError::BranchFailures(n)),
            }
        }
    }
}

/// Select, confirm, and run one batch.
pub(crate) async fn run_archive(
    client: Arc<dyn RefClient>,
    args: &ArchiveArgs,
    prompt: &mut dyn Prompt,
    options: OrchestratorOptions,
) -> Result<ArchiveReport> {
    let mut set = WorkingSet::load(client.as_ref(), &args.repo).await?;
    let branches = resolve_selection(&mut set, &args.criteria())?;
    let plan = ArchivePlan::new(args.mode, &branches);

    if args.dry_run {
        return Ok(ArchiveReport::DryRun(plan));
    }

    let confirmation =
        ConfirmationGate::confirm(prompt, args.mode, &branches, args.confirm.as_deref())?;
    info!(
        repo = %args.repo,
        mode = %confirmation.mode(),
        branches = confirmation.branches().len(),
        "confirmed"
    );

    let orchestrator = Orchestrator::new(client, options);
    let result = orchestrator
        .run(&args.repo, &confirmation.into_request())
        .await?;
    let remaining = apply_to_selection(&mut set, &result);

    Ok(ArchiveReport::Ran {
        plan,
        result,
        remaining,
    })
}

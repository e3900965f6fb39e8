//! Display and formatting utilities for archive command output.

use super::ArchivePlan;
use crate::archive::{BatchResult, BranchOperationOutcome, Summary, aggregate::action_label};
use crate::cli::ArchiveArgs;
use crate::context::RepoId;
use crate::error::{BarcError, Result};
use crate::selection::Branch;

/// Print what a batch would do.
pub fn print_plan(repo: &RepoId, plan: &ArchivePlan) {
    for line in plan_lines(repo, plan) {
        println!("{}", line);
    }
}

/// Print a finished batch as text or JSON.
pub fn print_result(
    args: &ArchiveArgs,
    plan: &ArchivePlan,
    result: &BatchResult,
    remaining: &[Branch],
) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| BarcError::UserError(format!("failed to serialize results: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    for line in result_lines(&args.repo, plan, result) {
        println!("{}", line);
    }
    println!();
    println!("{} branch(es) remain in {}.", remaining.len(), args.repo);
    Ok(())
}

pub(crate) fn plan_lines(repo: &RepoId, plan: &ArchivePlan) -> Vec<String> {
    let mut lines = vec![format!(
        "Plan for {} ({}, {} branch(es)):",
        repo,
        plan.mode,
        plan.targets.len()
    )];

    for (branch, tag) in &plan.targets {
        let mut steps = Vec::new();
        if let Some(tag) = tag {
            steps.push(format!("tag {}", tag));
        }
        if plan.mode.deletes_branch() {
            steps.push("delete branch".to_string());
        }
        lines.push(format!("  - {}: {}", branch, steps.join(", then ")));
    }

    for collision in &plan.collisions {
        lines.push(format!(
            "Warning: {} all map to {}; only one of them can be archived",
            collision.branches.join(", "),
            collision.tag
        ));
    }
    lines
}

pub(crate) fn result_lines(repo: &RepoId, plan: &ArchivePlan, result: &BatchResult) -> Vec<String> {
    let mut lines = vec![format!(
        "Results for {} ({}, {} ms):",
        repo,
        plan.mode,
        result.elapsed_ms()
    )];
    lines.extend(result.outcomes().iter().map(outcome_line));

    let summary = Summary::from_result(result);
    if let Some(message) = summary.success_message() {
        lines.push(String::new());
        lines.push(message);
    }
    if let Some(message) = summary.failure_message() {
        lines.push(String::new());
        lines.push(message);
    }
    lines
}

fn outcome_line(outcome: &BranchOperationOutcome) -> String {
    if outcome.success() {
        return format!("  ok      {} ({})", outcome.branch(), action_label(outcome));
    }

    let partial = match outcome.tag_name() {
        Some(tag) if outcome.tag_created() => format!(" [tag {} was created]", tag),
        _ => String::new(),
    };
    format!(
        "  FAILED  {}: {}{}",
        outcome.branch(),
        outcome.error().unwrap_or("unknown error"),
        partial
    )
}

//! Implementation of the `barc branches` command.

use super::Session;
use crate::cli::BranchesArgs;
use crate::error::{BarcError, Result};
use crate::selection::{Branch, list_branches};

pub async fn cmd_branches(session: &Session, args: BranchesArgs) -> Result<()> {
    let client = session.client()?;
    let branches = list_branches(client.as_ref(), &args.repo).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&branches)
            .map_err(|e| BarcError::UserError(format!("failed to serialize branches: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    if branches.is_empty() {
        println!("No branches found in {}.", args.repo);
        return Ok(());
    }

    println!("Branches in {} ({}):", args.repo, branches.len());
    for line in render_table(&branches) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per branch: name, short SHA, markers.
fn render_table(branches: &[Branch]) -> Vec<String> {
    let width = branches.iter().map(|b| b.name.len()).max().unwrap_or(0);
    branches
        .iter()
        .map(|b| {
            let mut markers = Vec::new();
            if b.is_default {
                markers.push("default");
            }
            if b.is_protected {
                markers.push("protected");
            }
            let short_sha: String = b.head_commit_sha.chars().take(7).collect();
            let line = format!("  {:<width$}  {}", b.name, short_sha, width = width);
            if markers.is_empty() {
                line
            } else {
                format!("{}  [{}]", line, markers.join(", "))
            }
        })
        .collect()
}

//! Implementation of the `barc tags` command.
//!
//! Previews archive tag names. Explicitly named branches need no network
//! access; `--all` and `--match` list the repository's branches first.

use super::Session;
use crate::archive::{TagCollision, find_tag_collisions, tag_name_for};
use crate::cli::TagsArgs;
use crate::error::{BarcError, Result};
use crate::selection::{WorkingSet, resolve_selection};

pub async fn cmd_tags(session: &Session, args: TagsArgs) -> Result<()> {
    let criteria = args.criteria();

    let branches = if criteria.is_bulk() {
        let client = session.client()?;
        let mut set = WorkingSet::load(client.as_ref(), &args.repo).await?;
        resolve_selection(&mut set, &criteria)?
    } else if criteria.explicit.is_empty() {
        return Err(BarcError::UserError(
            "no branches selected; name branches or use --all / --match".to_string(),
        ));
    } else {
        criteria.explicit
    };

    let (pairs, collisions) = tag_plan(&branches);
    let width = pairs.iter().map(|(b, _)| b.len()).max().unwrap_or(0);
    for (branch, tag) in &pairs {
        println!("{:<width$}  ->  {}", branch, tag, width = width);
    }
    for collision in &collisions {
        eprintln!(
            "Warning: {} all map to {}; only one of them can be archived",
            collision.branches.join(", "),
            collision.tag
        );
    }
    Ok(())
}

/// Each branch with its archive tag, plus the tag names more than one branch maps to.
fn tag_plan(branches: &[String]) -> (Vec<(String, String)>, Vec<TagCollision>) {
    let pairs = branches
        .iter()
        .map(|b| (b.clone(), tag_name_for(b)))
        .collect();
    (pairs, find_tag_collisions(branches))
}

//! Branch listing and caller-side selection.
//!
//! A [`WorkingSet`] holds the repository's branches as last listed plus the
//! operator's current selection. Protected branches can never be selected.
//! Bulk selection (`--all`, glob patterns) also skips the default branch; it
//! can only be picked by name, and the pipeline will still refuse to delete it.

use crate::context::RepoId;
use crate::error::{BarcError, Result};
use crate::github::{RefClient, RemoteBranch};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::collections::BTreeSet;

/// A branch of the hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    #[serde(rename = "commitSha")]
    pub head_commit_sha: String,
    #[serde(rename = "protected")]
    pub is_protected: bool,
    #[serde(rename = "default")]
    pub is_default: bool,
}

impl Branch {
    pub fn from_remote(remote: RemoteBranch, default_branch: &str) -> Self {
        let is_default = remote.name == default_branch;
        Self {
            name: remote.name,
            head_commit_sha: remote.sha,
            is_protected: remote.protected,
            is_default,
        }
    }

    /// Whether `--all` and glob patterns may pick this branch.
    pub fn bulk_selectable(&self) -> bool {
        !self.is_protected && !self.is_default
    }
}

/// List branches with their protection and default markers.
pub async fn list_branches(client: &dyn RefClient, repo: &RepoId) -> Result<Vec<Branch>> {
    let default_branch = client.get_default_branch(repo).await?;
    let remote = client.list_branches(repo).await?;
    Ok(remote
        .into_iter()
        .map(|b| Branch::from_remote(b, &default_branch))
        .collect())
}

/// Branches plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    branches: Vec<Branch>,
    selected: BTreeSet<String>,
}

impl WorkingSet {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self {
            branches,
            selected: BTreeSet::new(),
        }
    }

    /// Load the working set from the hosting API, nothing selected.
    pub async fn load(client: &dyn RefClient, repo: &RepoId) -> Result<Self> {
        Ok(Self::new(list_branches(client, repo).await?))
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn get(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// Select one branch by name.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let branch = self
            .get(name)
            .ok_or_else(|| BarcError::NotFound(format!("Branch not found: {}", name)))?;
        if branch.is_protected {
            return Err(BarcError::UserError(format!(
                "branch '{}' is protected and cannot be selected",
                name
            )));
        }
        self.selected.insert(name.to_string());
        Ok(())
    }

    /// Select every branch bulk selection may pick.
    pub fn select_all(&mut self) -> usize {
        self.select_where(|b| b.bulk_selectable())
    }

    /// Select every bulk-selectable branch matching any pattern.
    pub fn select_matching(&mut self, patterns: &GlobSet) -> usize {
        self.select_where(|b| b.bulk_selectable() && patterns.is_match(&b.name))
    }

    /// Drop matching branches from the selection.
    pub fn deselect_matching(&mut self, patterns: &GlobSet) -> usize {
        let before = self.selected.len();
        self.selected.retain(|name| !patterns.is_match(name));
        before - self.selected.len()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected branch names in listing order.
    pub fn selected_names(&self) -> Vec<String> {
        self.branches
            .iter()
            .filter(|b| self.selected.contains(&b.name))
            .map(|b| b.name.clone())
            .collect()
    }

    /// Keep only branches for which `keep` holds; the selection is cleared.
    pub(crate) fn retain_and_clear<F>(&mut self, keep: F)
    where
        F: FnMut(&Branch) -> bool,
    {
        self.branches.retain(keep);
        self.selected.clear();
    }

    fn select_where<F>(&mut self, pick: F) -> usize
    where
        F: Fn(&Branch) -> bool,
    {
        let before = self.selected.len();
        for branch in self.branches.iter().filter(|b| pick(b)) {
            self.selected.insert(branch.name.clone());
        }
        self.selected.len() - before
    }
}

/// How the CLI asked for branches.
#[derive(Debug, Clone, Default)]
pub struct SelectionCriteria {
    /// Branches named explicitly, kept in this order.
    pub explicit: Vec<String>,
    pub all: bool,
    pub matches: Vec<String>,
    /// Patterns removed from `--all`/`--match` picks. Explicit names are kept.
    pub excludes: Vec<String>,
}

impl SelectionCriteria {
    pub fn is_bulk(&self) -> bool {
        self.all || !self.matches.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty() && !self.is_bulk()
    }
}

/// Turn selection criteria into the ordered branch list for one batch.
///
/// Explicit names come first in the order given; names not in the working
/// set are passed through so the pipeline reports them as missing. Bulk
/// picks follow in listing order.
pub fn resolve_selection(
    set: &mut WorkingSet,
    criteria: &SelectionCriteria,
) -> Result<Vec<String>> {
    if criteria.is_empty() {
        return Err(BarcError::UserError(
            "no branches selected; name branches or use --all / --match".to_string(),
        ));
    }

    let protected: Vec<&str> = criteria
        .explicit
        .iter()
        .filter(|name| set.get(name).is_some_and(|b| b.is_protected))
        .map(String::as_str)
        .collect();
    if !protected.is_empty() {
        return Err(BarcError::UserError(format!(
            "protected branches cannot be archived or deleted: {}",
            protected.join(", ")
        )));
    }

    set.clear_selection();
    if criteria.all {
        set.select_all();
    }
    if !criteria.matches.is_empty() {
        set.select_matching(&build_globset(&criteria.matches)?);
    }
    if !criteria.excludes.is_empty() {
        set.deselect_matching(&build_globset(&criteria.excludes)?);
    }

    let mut resolved: Vec<String> = Vec::new();
    for name in &criteria.explicit {
        if !resolved.contains(name) {
            resolved.push(name.clone());
        }
    }
    for name in set.selected_names() {
        if !resolved.contains(&name) {
            resolved.push(name);
        }
    }
    for name in &criteria.explicit {
        if set.get(name).is_some() {
            set.select(name)?;
        }
    }

    if resolved.is_empty() {
        return Err(BarcError::UserError(
            "no branches matched the selection".to_string(),
        ));
    }
    Ok(resolved)
}

pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        let glob = Glob::new(pattern).map_err(|e| {
            BarcError::UserError(format!("invalid branch pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| BarcError::UserError(format!("invalid branch patterns: {}", e)))
}

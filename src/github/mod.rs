//! External Ref Client for the hosting API.
//!
//! The rest of the crate only talks to the hosting service through the
//! [`RefClient`] trait: a handful of primitive ref operations, each of which
//! either succeeds or reports a [`BarcError`]. Nothing here retries.
//!
//! [`HttpRefClient`] is the production implementation over the GitHub REST
//! API (v3 JSON, bearer token).

mod client;
mod types;

#[cfg(test)]
mod tests;

pub use client::HttpRefClient;

use crate::context::RepoId;
use crate::error::Result;
use async_trait::async_trait;

/// Result of probing for a tag ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagProbe {
    /// The exact tag ref exists.
    Exists,
    /// The hosting API confirmed the exact tag ref does not exist.
    Absent,
}

/// A branch as reported by the list-branches endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    /// Branch name (may contain `/`).
    pub name: String,
    /// Commit the branch currently points to.
    pub sha: String,
    /// Whether the hosting service enforces branch protection.
    pub protected: bool,
}

/// Primitive ref operations against the hosting API.
///
/// Implementations must be safe to share across concurrently running
/// pipelines; they hold no per-branch state.
#[async_trait]
pub trait RefClient: Send + Sync {
    /// List every branch of the repository.
    async fn list_branches(&self, repo: &RepoId) -> Result<Vec<RemoteBranch>>;

    /// Read the commit a branch points to.
    ///
    /// Fails with `NotFound` when the exact branch ref does not exist.
    async fn read_branch_ref(&self, repo: &RepoId, branch: &str) -> Result<String>;

    /// Probe for an exact tag ref.
    ///
    /// Only a confirmed answer is returned as `Ok`; a failed probe is an error,
    /// never `Absent`.
    async fn probe_tag_ref(&self, repo: &RepoId, tag: &str) -> Result<TagProbe>;

    /// Create `refs/tags/<tag>` pointing at `sha`.
    async fn create_tag_ref(&self, repo: &RepoId, tag: &str, sha: &str) -> Result<()>;

    /// Delete `refs/heads/<branch>`.
    async fn delete_branch_ref(&self, repo: &RepoId, branch: &str) -> Result<()>;

    /// Name of the repository's default branch.
    async fn get_default_branch(&self, repo: &RepoId) -> Result<String>;

    /// Whether the exact tag ref exists.
    async fn tag_ref_exists(&self, repo: &RepoId, tag: &str) -> Result<bool> {
        Ok(self.probe_tag_ref(repo, tag).await? == TagProbe::Exists)
    }
}

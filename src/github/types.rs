//! Wire types for the GitHub REST API.
//!
//! These mirror only the fields barc reads; everything else in the upstream
//! payloads is ignored.

use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{name}/git/refs/{ref}`.
///
/// GitHub answers an exact match with a single object, and a prefix match
/// (for example `heads/feature` when only `heads/feature/x` exists) with an
/// array. Only the single-object form counts as "found".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RefLookup {
    Exact(GitRef),
    Prefix(Vec<serde_json::Value>),
}

#[derive(Debug, Deserialize)]
pub(super) struct GitRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitObject {
    pub sha: String,
}

/// `POST /repos/{owner}/{name}/git/refs` body.
#[derive(Debug, Serialize)]
pub(super) struct CreateRef<'a> {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: &'a str,
}

/// `GET /repos/{owner}/{name}`.
#[derive(Debug, Deserialize)]
pub(super) struct RepoMetadata {
    pub default_branch: String,
}

/// One entry of `GET /repos/{owner}/{name}/branches`.
#[derive(Debug, Deserialize)]
pub(super) struct BranchEntry {
    pub name: String,
    pub commit: CommitRef,
    #[serde(default)]
    pub protected: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitRef {
    pub sha: String,
}

/// Error payload GitHub attaches to most non-success responses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}

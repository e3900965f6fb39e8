//! In-memory hosting API used by pipeline, orchestrator, selection and server tests.

use crate::context::RepoId;
use crate::error::{BarcError, Result};
use crate::github::{RefClient, RemoteBranch, TagProbe};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// One primitive call observed by [`FakeRefClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListBranches,
    ReadBranch(String),
    ProbeTag(String),
    CreateTag(String, String),
    DeleteBranch(String),
    DefaultBranch,
}

impl Call {
    /// The branch or tag this call touched, if any.
    pub(crate) fn subject(&self) -> Option<&str> {
        match self {
            Call::ReadBranch(s) | Call::ProbeTag(s) | Call::DeleteBranch(s) => Some(s),
            Call::CreateTag(tag, _) => Some(tag),
            Call::ListBranches | Call::DefaultBranch => None,
        }
    }
}

#[derive(Default)]
struct State {
    branches: BTreeMap<String, String>,
    protected: BTreeSet<String>,
    tags: BTreeMap<String, String>,
    calls: Vec<Call>,
    fail_create: BTreeSet<String>,
    fail_delete: BTreeSet<String>,
    fail_probe: BTreeSet<String>,
    unauthorized: bool,
}

/// A [`RefClient`] backed by maps, with failure injection and call recording.
pub(crate) struct FakeRefClient {
    default_branch: String,
    state: Mutex<State>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRefClient {
    /// A repository whose default branch is `default_branch`, which exists.
    pub(crate) fn new(default_branch: &str) -> Self {
        let fake = Self {
            default_branch: default_branch.to_string(),
            state: Mutex::new(State::default()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        };
        fake.add_branch(default_branch);
        fake
    }

    /// Sleep this long inside every call, so overlap can be observed.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    pub(crate) fn add_branch(&self, name: &str) {
        let sha = format!("sha-{}", name.replace('/', "-"));
        self.state().branches.insert(name.to_string(), sha);
    }

    pub(crate) fn add_protected_branch(&self, name: &str) {
        self.add_branch(name);
        self.state().protected.insert(name.to_string());
    }

    pub(crate) fn add_tag(&self, tag: &str) {
        self.state()
            .tags
            .insert(tag.to_string(), "sha-existing".to_string());
    }

    /// Make `create_tag_ref` fail with HTTP 500 for this tag.
    pub(crate) fn fail_create_for(&self, tag: &str) {
        self.state().fail_create.insert(tag.to_string());
    }

    /// Make `delete_branch_ref` fail with HTTP 422 for this branch.
    pub(crate) fn fail_delete_for(&self, branch: &str) {
        self.state().fail_delete.insert(branch.to_string());
    }

    /// Make `probe_tag_ref` fail with a transport error for this tag.
    pub(crate) fn fail_probe_for(&self, tag: &str) {
        self.state().fail_probe.insert(tag.to_string());
    }

    /// Make every call fail as if the token were rejected.
    pub(crate) fn reject_token(&self) {
        self.state().unauthorized = true;
    }

    pub(crate) fn has_branch(&self, name: &str) -> bool {
        self.state().branches.contains_key(name)
    }

    pub(crate) fn tag_target(&self, tag: &str) -> Option<String> {
        self.state().tags.get(tag).cloned()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Highest number of calls observed running at the same time.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: Call) -> Result<()> {
        {
            let mut state = self.state();
            state.calls.push(call);
            if state.unauthorized {
                return Err(BarcError::Auth("hosting API rejected the token".to_string()));
            }
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RefClient for FakeRefClient {
    async fn list_branches(&self, _repo: &RepoId) -> Result<Vec<RemoteBranch>> {
        self.enter(Call::ListBranches).await?;
        let state = self.state();
        Ok(state
            .branches
            .iter()
            .map(|(name, sha)| RemoteBranch {
                name: name.clone(),
                sha: sha.clone(),
                protected: state.protected.contains(name),
            })
            .collect())
    }

    async fn read_branch_ref(&self, _repo: &RepoId, branch: &str) -> Result<String> {
        self.enter(Call::ReadBranch(branch.to_string())).await?;
        self.state()
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| BarcError::NotFound(format!("Branch not found: {}", branch)))
    }

    async fn probe_tag_ref(&self, _repo: &RepoId, tag: &str) -> Result<TagProbe> {
        self.enter(Call::ProbeTag(tag.to_string())).await?;
        let state = self.state();
        if state.fail_probe.contains(tag) {
            return Err(BarcError::transport("check tag ref failed: connection reset"));
        }
        Ok(if state.tags.contains_key(tag) {
            TagProbe::Exists
        } else {
            TagProbe::Absent
        })
    }

    async fn create_tag_ref(&self, _repo: &RepoId, tag: &str, sha: &str) -> Result<()> {
        self.enter(Call::CreateTag(tag.to_string(), sha.to_string()))
            .await?;
        let mut state = self.state();
        if state.fail_create.contains(tag) {
            return Err(BarcError::upstream(500, "Internal Server Error"));
        }
        if state.tags.contains_key(tag) {
            return Err(BarcError::upstream(422, "Reference already exists"));
        }
        state.tags.insert(tag.to_string(), sha.to_string());
        Ok(())
    }

    async fn delete_branch_ref(&self, _repo: &RepoId, branch: &str) -> Result<()> {
        self.enter(Call::DeleteBranch(branch.to_string())).await?;
        let mut state = self.state();
        if state.fail_delete.contains(branch) {
            return Err(BarcError::upstream(422, "Cannot delete protected branch"));
        }
        match state.branches.remove(branch) {
            Some(_) => Ok(()),
            None => Err(BarcError::upstream(422, "Reference does not exist")),
        }
    }

    async fn get_default_branch(&self, _repo: &RepoId) -> Result<String> {
        self.enter(Call::DefaultBranch).await?;
        Ok(self.default_branch.clone())
    }
}

/// Repository identity used throughout the tests.
pub(crate) fn test_repo() -> RepoId {
    RepoId::new("octo", "widgets").expect("valid test repo")
}

/// Owned branch names from string literals.
pub(crate) fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

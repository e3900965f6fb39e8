//! reqwest-backed [`RefClient`] for the GitHub REST API.

use super::types::{ApiErrorBody, BranchEntry, CreateRef, RefLookup, RepoMetadata};
use super::{RefClient, RemoteBranch, TagProbe};
use crate::config::Config;
use crate::context::RepoId;
use crate::credential::Credential;
use crate::error::{BarcError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

const GITHUB_JSON: &str = "application/vnd.github.v3+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: usize = 100;
const MAX_REASON_CHARS: usize = 200;

/// Hosting API client authenticated with an explicit [`Credential`].
#[derive(Debug)]
pub struct HttpRefClient {
    http: Client,
    base_url: Url,
    credential: Credential,
}

impl HttpRefClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// `timeout` bounds every individual request; an expired request is
    /// reported as an `ExternalApi` error like any other transport failure.
    pub fn new(base_url: Url, credential: Credential, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(BarcError::UserError(format!(
                "API base URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let http = Client::builder()
            .user_agent(concat!("barc/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| BarcError::UserError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            credential,
        })
    }

    /// Create a client from the resolved config.
    pub fn from_config(config: &Config, credential: Credential) -> Result<Self> {
        Self::new(config.api_base_url()?, credential, config.request_timeout())
    }

    /// Build `{base}/repos/{owner}/{name}/{tail...}`, encoding each tail
    /// segment on its own so `/` inside a branch name stays a separator.
    fn endpoint<I>(&self, repo: &RepoId, tail: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BarcError::UserError(format!(
                    "API base URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("repos")
            .push(&repo.owner)
            .push(&repo.name)
            .extend(tail);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.credential.bearer_header())
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BarcError::transport(format!("{} timed out", what))
            } else {
                BarcError::transport(format!("{} failed: {}", what, e))
            }
        })?;
        debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "{}",
            what
        );
        Ok(response)
    }

    /// Fetch a ref and report whether the exact ref exists, with its SHA.
    async fn lookup_ref(
        &self,
        repo: &RepoId,
        full_ref: &str,
        what: &str,
    ) -> Result<Option<String>> {
        let url = self.endpoint(repo, std::iter::once("git").chain(full_ref.split('/')))?;
        let response = self.send(self.request(Method::GET, url), what).await?;

        match response.status() {
            StatusCode::OK => {
                let lookup: RefLookup = response.json().await.map_err(|e| {
                    BarcError::transport(format!("{}: unexpected response body: {}", what, e))
                })?;
                match lookup {
                    RefLookup::Exact(git_ref) if git_ref.reference == full_ref => {
                        Ok(Some(git_ref.object.sha))
                    }
                    _ => Ok(None),
                }
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from(response).await),
        }
    }
}

#[async_trait]
impl RefClient for HttpRefClient {
    async fn list_branches(&self, repo: &RepoId) -> Result<Vec<RemoteBranch>> {
        let mut branches = Vec::new();
        let mut page = 1usize;

        loop {
            let mut url = self.endpoint(repo, ["branches"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let response = self
                .send(self.request(Method::GET, url), "list branches")
                .await?;
            if response.status() != StatusCode::OK {
                return Err(error_from(response).await);
            }

            let entries: Vec<BranchEntry> = response.json().await.map_err(|e| {
                BarcError::transport(format!("list branches: unexpected response body: {}", e))
            })?;
            let count = entries.len();
            branches.extend(entries.into_iter().map(|entry| RemoteBranch {
                name: entry.name,
                sha: entry.commit.sha,
                protected: entry.protected,
            }));

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(branches)
    }

    async fn read_branch_ref(&self, repo: &RepoId, branch: &str) -> Result<String> {
        let full_ref = format!("refs/heads/{}", branch);
        self.lookup_ref(repo, &full_ref, "read branch ref")
            .await?
            .ok_or_else(|| BarcError::NotFound(format!("Branch not found: {}", branch)))
    }

    async fn probe_tag_ref(&self, repo: &RepoId, tag: &str) -> Result<TagProbe> {
        let full_ref = format!("refs/tags/{}", tag);
        let found = self.lookup_ref(repo, &full_ref, "check tag ref").await?;
        Ok(if found.is_some() {
            TagProbe::Exists
        } else {
            TagProbe::Absent
        })
    }

    async fn create_tag_ref(&self, repo: &RepoId, tag: &str, sha: &str) -> Result<()> {
        let url = self.endpoint(repo, ["git", "refs"])?;
        let body = CreateRef {
            reference: format!("refs/tags/{}", tag),
            sha,
        };
        let response = self
            .send(self.request(Method::POST, url).json(&body), "create tag ref")
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    async fn delete_branch_ref(&self, repo: &RepoId, branch: &str) -> Result<()> {
        let url = self.endpoint(
            repo,
            ["git", "refs", "heads"].into_iter().chain(branch.split('/')),
        )?;
        let response = self
            .send(self.request(Method::DELETE, url), "delete branch ref")
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    async fn get_default_branch(&self, repo: &RepoId) -> Result<String> {
        let url = self.endpoint(repo, std::iter::empty::<&str>())?;
        let response = self
            .send(self.request(Method::GET, url), "read repository")
            .await?;

        if response.status() != StatusCode::OK {
            return Err(error_from(response).await);
        }

        let metadata: RepoMetadata = response.json().await.map_err(|e| {
            BarcError::transport(format!("read repository: unexpected response body: {}", e))
        })?;
        Ok(metadata.default_branch)
    }
}

/// Turn a non-success response into an error carrying the upstream reason.
async fn error_from(response: Response) -> BarcError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let reason = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("").to_string(),
        Err(_) => body.trim().chars().take(MAX_REASON_CHARS).collect(),
    };

    if status == StatusCode::UNAUTHORIZED {
        return BarcError::Auth(format!("hosting API rejected the token: {}", reason));
    }

    BarcError::upstream(status.as_u16(), reason)
}

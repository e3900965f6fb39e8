//! Request handlers.

use super::error::ApiError;
use super::state::AppState;
use crate::archive::{BatchRequest, BatchResponse, Orchestrator, OrchestratorOptions};
use crate::context::RepoId;
use crate::credential::Credential;
use crate::error::BarcError;
use crate::github::RefClient;
use crate::selection::{Branch, list_branches};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, header::AUTHORIZATION},
};
use std::sync::Arc;
use tracing::info;

/// GET /healthz
pub async fn health() -> &'static str {
    "ok"
}

/// GET /repos/:owner/:name/branches
pub async fn get_branches(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Vec<Branch>>, ApiError> {
    let repo = RepoId::new(owner, name)?;
    let client = connect(&state, &headers)?;

    let branches = list_branches(client.as_ref(), &repo).await?;
    Ok(Json(branches))
}

/// POST /repos/:owner/:name/archive
///
/// Confirmation of destructive modes is the caller's job; this endpoint
/// runs whatever it is handed.
pub async fn post_archive(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let repo = RepoId::new(owner, name)?;
    let client = connect(&state, &headers)?;
    let Json(request) = payload.map_err(|rejection| {
        BarcError::UserError(format!("invalid request body: {}", rejection.body_text()))
    })?;

    info!(
        repo = %repo,
        operation = %request.operation(),
        branches = request.branches().len(),
        "archive request"
    );

    let orchestrator = Orchestrator::new(
        client,
        OrchestratorOptions {
            max_concurrency: state.max_concurrency,
            cancel: Some(state.shutdown.child_token()),
        },
    );
    let result = orchestrator.run(&repo, &request).await?;
    Ok(Json(result.into()))
}

fn connect(state: &AppState, headers: &HeaderMap) -> Result<Arc<dyn RefClient>, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| BarcError::Auth("missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| BarcError::Auth("malformed Authorization header".to_string()))?;
    let credential = Credential::from_authorization_header(header)?;
    Ok(state.connector.connect(credential)?)
}

//! HTTP surface for the batch core.
//!
//! Routes:
//! - `GET  /healthz`
//! - `GET  /repos/:owner/:name/branches`
//! - `POST /repos/:owner/:name/archive`
//!
//! Every repository route needs `Authorization: Bearer <token>`; the token is
//! the caller's hosting API credential and is used for that request only.

mod error;
mod handlers;
mod state;


pub use error::ApiError;
pub use state::{AppState, ClientConnector, HttpConnector};

use crate::error::{BarcError, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tracing::{info, warn};

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/repos/:owner/:name/branches", get(handlers::get_branches))
        .route("/repos/:owner/:name/archive", post(handlers::post_archive))
        .with_state(state)
}

/// Serve until ctrl-c. Batches still running at shutdown stop launching new
/// branches; branches already started run to completion.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BarcError::UserError(format!("failed to bind {}: {}", addr, e)))?;
    let local = listener
        .local_addr()
        .map_err(|e| BarcError::UserError(format!("failed to read bound address: {}", e)))?;
    info!(addr = %local, "listening");
    println!("Listening on http://{}", local);

    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown requested"),
                Err(e) => {
                    warn!(error = %e, "cannot listen for ctrl-c; serving until killed");
                    std::future::pending::<()>().await;
                }
            }
            shutdown.cancel();
        })
        .await
        .map_err(|e| BarcError::UserError(format!("server error: {}", e)))
}

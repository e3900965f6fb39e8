//! Implementation of the `barc serve` command.

use super::Session;
use crate::cli::ServeArgs;
use crate::error::Result;
use crate::server::{AppState, HttpConnector, serve};
use std::sync::Arc;

pub async fn cmd_serve(session: &Session, args: ServeArgs) -> Result<()> {
    let addr = match args.bind {
        Some(addr) => addr,
        None => session.config.bind_addr()?,
    };
    let connector = HttpConnector::from_config(&session.config)?;
    let state = AppState::new(Arc::new(connector), session.config.max_concurrency);
    serve(addr, state).await
}

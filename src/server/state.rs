//! Shared state for the HTTP surface.

use crate::config::Config;
use crate::credential::Credential;
use crate::error::Result;
use crate::github::{HttpRefClient, RefClient};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Builds a hosting API client for one caller's credential.
pub trait ClientConnector: Send + Sync {
    fn connect(&self, credential: Credential) -> Result<Arc<dyn RefClient>>;
}

/// Connects to the configured hosting API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: Url,
    timeout: Duration,
}

impl HttpConnector {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.api_base_url()?,
            timeout: config.request_timeout(),
        })
    }
}

impl ClientConnector for HttpConnector {
    fn connect(&self, credential: Credential) -> Result<Arc<dyn RefClient>> {
        let client: Arc<dyn RefClient> = Arc::new(HttpRefClient::new(
            self.base_url.clone(),
            credential,
            self.timeout,
        )?);
        Ok(client)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn ClientConnector>,
    pub max_concurrency: usize,
    /// Cancelled on shutdown; running batches stop launching new branches.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(connector: Arc<dyn ClientConnector>, max_concurrency: usize) -> Self {
        Self {
            connector,
            max_concurrency,
            shutdown: CancellationToken::new(),
        }
    }
}

//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for barc.
///
/// This struct represents the contents of `.barc.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Hosting API
    // =========================================================================
    /// Base URL of the hosting REST API (GitHub Enterprise uses `https://host/api/v3`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Seconds before a single API call is abandoned and reported as failed.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Name of the environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    // =========================================================================
    // Batch execution
    // =========================================================================
    /// Maximum number of branches (or preflight probes) in flight at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    // =========================================================================
    // HTTP surface
    // =========================================================================
    /// Address `barc serve` listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            token_env: default_token_env(),
            max_concurrency: default_max_concurrency(),
            bind_address: default_bind_address(),
        }
    }
}

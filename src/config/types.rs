//! Defaults and constants for the config model.

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".barc.yaml";

/// Prefix for environment variables that override config values.
pub const ENV_PREFIX: &str = "BARC_";

// Default value functions for serde
pub(crate) fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}
pub(crate) fn default_max_concurrency() -> usize {
    8
}
pub(crate) fn default_request_timeout_secs() -> u64 {
    30
}
pub(crate) fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
pub(crate) fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

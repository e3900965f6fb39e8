//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::{BarcError, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(BarcError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            BarcError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the effective config for a command invocation.
    ///
    /// An explicit path must exist. Without one, `.barc.yaml` in the working
    /// directory is used when present, and defaults otherwise. Environment
    /// overrides are applied last and the result is validated again.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| BarcError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `BARC_*` overrides using the given variable lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(value) = var("API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = var("MAX_CONCURRENCY") {
            self.max_concurrency = parse_number("BARC_MAX_CONCURRENCY", &value)?;
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number("BARC_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = var("BIND_ADDRESS") {
            self.bind_address = value;
        }

        Ok(())
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `max_concurrency` must be positive
    /// - `request_timeout_secs` must be positive
    /// - `api_base_url` must be an absolute http(s) URL
    /// - `token_env` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(BarcError::UserError(
                "config validation failed: max_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(BarcError::UserError(
                "config validation failed: request_timeout_secs must be greater than 0"
                    .to_string(),
            ));
        }

        if self.token_env.trim().is_empty() {
            return Err(BarcError::UserError(
                "config validation failed: token_env must be non-empty".to_string(),
            ));
        }

        self.api_base_url()?;
        Ok(())
    }

    /// Parsed API base URL.
    pub fn api_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            BarcError::UserError(format!(
                "config validation failed: api_base_url '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BarcError::UserError(format!(
                "config validation failed: api_base_url must use http or https (found '{}')",
                other
            ))),
        }
    }

    /// Per-call timeout for hosting API requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed listen address for `barc serve`.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            BarcError::UserError(format!(
                "invalid bind address '{}': {}",
                self.bind_address, e
            ))
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        BarcError::UserError(format!(
            "{} must be a non-negative integer (found '{}')",
            name, value
        ))
    })
}

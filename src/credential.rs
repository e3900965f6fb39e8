//! Explicit API credential handling.
//!
//! The token is never read from ambient global state by the client. It is
//! resolved once at the boundary (CLI flag, environment variable, or an HTTP
//! `Authorization` header) and threaded into the client that uses it.

use crate::error::{BarcError, Result};
use secrecy::{ExposeSecret, SecretString};

/// A bearer token for the hosting API.
#[derive(Debug)]
pub struct Credential {
    token: SecretString,
}

impl Credential {
    /// Wrap a raw token. Empty or whitespace-only tokens are rejected.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(BarcError::Auth("token is empty".to_string()));
        }
        Ok(Self {
            token: SecretString::from(trimmed.to_string()),
        })
    }

    /// Resolve a credential from an explicit flag value, falling back to the
    /// environment variable named `env_var`.
    pub fn resolve(flag: Option<&str>, env_var: &str) -> Result<Self> {
        Self::resolve_with(flag, env_var, |key| std::env::var(key).ok())
    }

    /// Like [`Credential::resolve`], with an injectable environment lookup.
    pub fn resolve_with<F>(flag: Option<&str>, env_var: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = flag {
            return Self::new(token);
        }

        match lookup(env_var) {
            Some(token) if !token.trim().is_empty() => Self::new(token),
            _ => Err(BarcError::Auth(format!(
                "no API token found. Pass --token or set {}",
                env_var
            ))),
        }
    }

    /// Parse an `Authorization: Bearer <token>` header value.
    pub fn from_authorization_header(value: &str) -> Result<Self> {
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .ok_or_else(|| {
                BarcError::Auth("Missing or invalid authorization header".to_string())
            })?;
        Self::new(token)
            .map_err(|_| BarcError::Auth("Missing or invalid authorization header".to_string()))
    }

    /// Value for an outgoing `Authorization` header.
    pub(crate) fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

//! Repository identity for barc.
//!
//! Every hosting API call is scoped to one repository, named `owner/name`.
//! This module parses and validates that identity once so the client and the
//! orchestrator can pass it around without re-checking.

use crate::error::{BarcError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("segment pattern is valid"));

/// A hosted repository, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// User or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoId {
    /// Build a repository identity from its two parts, validating both.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        validate_segment("owner", &owner)?;
        validate_segment("name", &name)?;
        Ok(Self { owner, name })
    }
}

fn validate_segment(label: &str, value: &str) -> Result<()> {
    if value == "." || value == ".." || !SEGMENT.is_match(value) {
        return Err(BarcError::UserError(format!(
            "invalid repository {} '{}': use letters, digits, '-', '_' or '.'",
            label, value
        )));
    }
    Ok(())
}

impl FromStr for RepoId {
    type Err = BarcError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_end_matches(".git");
        match trimmed.split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name),
            _ => Err(BarcError::UserError(format!(
                "invalid repository '{}': expected OWNER/NAME",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

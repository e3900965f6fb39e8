//! Operation modes for a batch.

use crate::error::BarcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which steps a batch runs for every selected branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationMode {
    /// Create the archive tag; keep the branch.
    ArchiveOnly,
    /// Create the archive tag, then delete the branch.
    ArchiveAndDelete,
    /// Delete the branch without tagging.
    DeleteOnly,
}

impl OperationMode {
    /// All modes, in menu order.
    pub const ALL: [OperationMode; 3] = [
        OperationMode::ArchiveOnly,
        OperationMode::ArchiveAndDelete,
        OperationMode::DeleteOnly,
    ];

    /// Wire and CLI name.
    pub fn as_str(self) -> &'static str {
        match self {
            OperationMode::ArchiveOnly => "archive-only",
            OperationMode::ArchiveAndDelete => "archive-and-delete",
            OperationMode::DeleteOnly => "delete-only",
        }
    }

    /// Whether the mode creates an archive tag.
    pub fn creates_tag(self) -> bool {
        self != OperationMode::DeleteOnly
    }

    /// Whether the mode deletes the branch.
    pub fn deletes_branch(self) -> bool {
        self != OperationMode::ArchiveOnly
    }

    /// Whether the mode needs operator confirmation before it runs.
    pub fn is_destructive(self) -> bool {
        self.deletes_branch()
    }

    /// Text the operator must type to confirm this mode, if any.
    pub fn confirmation_token(self) -> Option<&'static str> {
        if !self.is_destructive() {
            return None;
        }
        match self {
            OperationMode::ArchiveAndDelete => Some("archive-delete"),
            _ => Some("delete"),
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationMode {
    type Err = BarcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                BarcError::UserError(format!(
                    "Invalid operation '{}': expected one of archive-only, archive-and-delete, delete-only",
                    s
                ))
            })
    }
}

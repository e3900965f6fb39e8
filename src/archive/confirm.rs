//! Confirmation Gate for destructive modes.
//!
//! Before a delete-bearing batch reaches the orchestrator, the operator is
//! shown the exact branch list and must type the mode's confirmation token
//! verbatim (`delete` or `archive-delete`). `ArchiveOnly` passes without
//! confirmation.
//!
//! The only way to turn a selection into a [`BatchRequest`] on the CLI path is
//! through a [`Confirmation`], so the gate cannot be skipped there. The
//! orchestrator itself does not re-check.

use super::mode::OperationMode;
use super::request::BatchRequest;
use crate::error::{BarcError, Result};
use std::io::{self, BufRead, IsTerminal, Write};

/// Proof that a selection passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    mode: OperationMode,
    branches: Vec<String>,
}

impl Confirmation {
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn into_request(self) -> BatchRequest {
        BatchRequest::new(self.branches, self.mode)
    }
}

/// Source of a typed confirmation token.
pub trait Prompt {
    /// Show `warning` and return what the operator typed, or `None` when no
    /// answer can be read (for example stdin is not a terminal).
    fn ask(&mut self, warning: &str, expected: &str) -> Result<Option<String>>;
}

/// Reads the token from an interactive stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, warning: &str, expected: &str) -> Result<Option<String>> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Ok(None);
        }

        println!("{}", warning);
        print!("Type '{}' to continue: ", expected);
        io::stdout().flush().ok();

        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| BarcError::UserError(format!("failed to read confirmation: {}", e)))?;
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

pub struct ConfirmationGate;

impl ConfirmationGate {
    /// Check a typed token against the mode's requirement.
    pub fn check(
        mode: OperationMode,
        branches: &[String],
        typed: Option<&str>,
    ) -> Result<Confirmation> {
        if let Some(expected) = mode.confirmation_token() {
            match typed {
                Some(token) if token == expected => {}
                Some(token) => {
                    return Err(BarcError::UserError(format!(
                        "confirmation '{}' does not match; type '{}' to run {}",
                        token, expected, mode
                    )));
                }
                None => {
                    return Err(BarcError::UserError(format!(
                        "confirmation required: {} is destructive; pass --confirm {}",
                        mode, expected
                    )));
                }
            }
        }

        Ok(Confirmation {
            mode,
            branches: branches.to_vec(),
        })
    }

    /// Run the gate, asking `prompt` when no token was supplied up front.
    pub fn confirm(
        prompt: &mut dyn Prompt,
        mode: OperationMode,
        branches: &[String],
        supplied: Option<&str>,
    ) -> Result<Confirmation> {
        let Some(expected) = mode.confirmation_token() else {
            return Self::check(mode, branches, None);
        };
        if supplied.is_some() {
            return Self::check(mode, branches, supplied);
        }

        let warning = Self::render_warning(mode, branches);
        let typed = prompt.ask(&warning, expected)?;
        Self::check(mode, branches, typed.as_deref())
    }

    /// The text shown to the operator before a destructive batch.
    pub fn render_warning(mode: OperationMode, branches: &[String]) -> String {
        let consequence = match mode {
            OperationMode::ArchiveOnly => {
                "An archive tag will be created for each branch. No branch is deleted."
            }
            OperationMode::ArchiveAndDelete => {
                "Each branch will be tagged under archive/ and then DELETED. \
                 The tag keeps the commit reachable."
            }
            OperationMode::DeleteOnly => {
                "Each branch will be DELETED without an archive tag. \
                 Commits only reachable from these branches may be lost."
            }
        };

        let mut out = format!(
            "About to run {} on {} branch(es):\n",
            mode,
            branches.len()
        );
        for branch in branches {
            out.push_str("  - ");
            out.push_str(branch);
            out.push('\n');
        }
        out.push_str(consequence);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::names;

    struct Scripted {
        answer: Option<String>,
        asked: Vec<(String, String)>,
    }

    impl Prompt for Scripted {
        fn ask(&mut self, warning: &str, expected: &str) -> Result<Option<String>> {
            self.asked.push((warning.to_string(), expected.to_string()));
            Ok(self.answer.clone())
        }
    }

    fn scripted(answer: Option<&str>) -> Scripted {
        Scripted {
            answer: answer.map(str::to_string),
            asked: Vec::new(),
        }
    }

    #[test]
    fn test_archive_only_needs_no_token() {
        let confirmed =
            ConfirmationGate::check(OperationMode::ArchiveOnly, &names(&["a"]), None).unwrap();
        assert_eq!(confirmed.mode(), OperationMode::ArchiveOnly);
        assert_eq!(confirmed.branches(), ["a"]);
    }

    #[test]
    fn test_destructive_modes_require_exact_token() {
        let branches = names(&["a", "b"]);

        assert!(
            ConfirmationGate::check(OperationMode::DeleteOnly, &branches, Some("delete")).is_ok()
        );
        assert!(
            ConfirmationGate::check(
                OperationMode::ArchiveAndDelete,
                &branches,
                Some("archive-delete")
            )
            .is_ok()
        );

        for typed in [None, Some("DELETE"), Some("delete "), Some("archive-delete")] {
            let err = ConfirmationGate::check(OperationMode::DeleteOnly, &branches, typed)
                .unwrap_err();
            assert!(matches!(err, BarcError::UserError(_)), "typed {:?}", typed);
        }
        assert!(
            ConfirmationGate::check(OperationMode::ArchiveAndDelete, &branches, Some("delete"))
                .is_err()
        );
    }

    #[test]
    fn test_confirmation_becomes_request() {
        let request = ConfirmationGate::check(
            OperationMode::DeleteOnly,
            &names(&["x", "y"]),
            Some("delete"),
        )
        .unwrap()
        .into_request();
        assert_eq!(request.branches(), ["x", "y"]);
        assert_eq!(request.operation(), OperationMode::DeleteOnly);
    }

    #[test]
    fn test_prompt_is_asked_only_when_needed() {
        let branches = names(&["feature/a"]);

        let mut prompt = scripted(Some("archive-delete"));
        ConfirmationGate::confirm(&mut prompt, OperationMode::ArchiveAndDelete, &branches, None)
            .unwrap();
        assert_eq!(prompt.asked.len(), 1);
        assert_eq!(prompt.asked[0].1, "archive-delete");
        assert!(prompt.asked[0].0.contains("feature/a"));

        let mut prompt = scripted(None);
        ConfirmationGate::confirm(&mut prompt, OperationMode::ArchiveOnly, &branches, None)
            .unwrap();
        ConfirmationGate::confirm(&mut prompt, OperationMode::DeleteOnly, &branches, Some("delete"))
            .unwrap();
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_unanswered_prompt_fails() {
        let mut prompt = scripted(None);
        let err = ConfirmationGate::confirm(
            &mut prompt,
            OperationMode::DeleteOnly,
            &names(&["a"]),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("--confirm delete"));
    }

    #[test]
    fn test_warning_lists_every_branch_and_consequence() {
        let warning =
            ConfirmationGate::render_warning(OperationMode::DeleteOnly, &names(&["a", "b/c"]));
        assert!(warning.contains("delete-only on 2 branch(es)"));
        assert!(warning.contains("  - a\n"));
        assert!(warning.contains("  - b/c\n"));
        assert!(warning.contains("without an archive tag"));
    }
}

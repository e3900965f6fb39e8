//! CLI argument parsing for barc.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::archive::OperationMode;
use crate::context::RepoId;
use crate::selection::SelectionCriteria;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Barc: bulk archive and delete branches of a hosted Git repository.
///
/// Archiving creates an immutable tag `archive/<branch>` at the branch head,
/// so a branch can be deleted without losing its commits.
#[derive(Parser, Debug)]
#[command(name = "barc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: .barc.yaml in the current directory, if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hosting API token. Defaults to the variable named by `token_env`.
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Increase diagnostic output (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for barc.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List a repository's branches.
    ///
    /// Protected and default branches are marked; neither is picked by
    /// `--all` or `--match`.
    Branches(BranchesArgs),

    /// Show the archive tag each selected branch would get.
    ///
    /// Warns when two branches derive the same tag name.
    Tags(TagsArgs),

    /// Archive and/or delete branches.
    ///
    /// Destructive modes require a typed confirmation: `delete` for
    /// delete-only, `archive-delete` for archive-and-delete.
    Archive(ArchiveArgs),

    /// Serve the batch API over HTTP.
    Serve(ServeArgs),
}

/// Branch selection shared by `tags` and `archive`.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Branches to operate on, by exact name.
    #[arg(value_name = "BRANCH")]
    pub branches: Vec<String>,

    /// Select every branch except protected and default branches.
    #[arg(long)]
    pub all: bool,

    /// Select branches matching a glob (`*` also matches `/`). Repeatable.
    #[arg(long = "match", value_name = "GLOB")]
    pub matches: Vec<String>,
}

/// Arguments for the `branches` command.
#[derive(Parser, Debug)]
pub struct BranchesArgs {
    /// Repository as OWNER/NAME.
    pub repo: RepoId,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `tags` command.
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Repository as OWNER/NAME.
    pub repo: RepoId,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the `archive` command.
#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    /// Repository as OWNER/NAME.
    pub repo: RepoId,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Drop branches matching a glob from `--all`/`--match` picks. Repeatable.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// archive-only, archive-and-delete, or delete-only.
    #[arg(long, value_name = "MODE")]
    pub mode: OperationMode,

    /// Confirmation token for destructive modes; prompts when omitted.
    #[arg(long, value_name = "TOKEN")]
    pub confirm: Option<String>,

    /// Print the plan without calling the hosting API to mutate anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ArchiveArgs {
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            explicit: self.selection.branches.clone(),
            all: self.selection.all,
            matches: self.selection.matches.clone(),
            excludes: self.exclude.clone(),
        }
    }
}

impl TagsArgs {
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            explicit: self.selection.branches.clone(),
            all: self.selection.all,
            matches: self.selection.matches.clone(),
            excludes: Vec::new(),
        }
    }
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `bind_address`).
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

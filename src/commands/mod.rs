//! Command implementations for barc.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and the [`Session`] every command starts from: the
//! resolved config plus the token flag, turned into a client on demand.

mod archive;
mod branches;
mod serve;
mod tags;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::credential::Credential;
use crate::error::Result;
use crate::github::{HttpRefClient, RefClient};
use std::sync::Arc;

/// Config and credential source for one CLI invocation.
pub struct Session {
    pub config: Config,
    token: Option<String>,
}

impl Session {
    pub fn new(config: Config, token: Option<String>) -> Self {
        Self { config, token }
    }

    pub fn credential(&self) -> Result<Credential> {
        Credential::resolve(self.token.as_deref(), &self.config.token_env)
    }

    /// A hosting API client authenticated with this session's credential.
    pub fn client(&self) -> Result<Arc<dyn RefClient>> {
        let client: Arc<dyn RefClient> =
            Arc::new(HttpRefClient::from_config(&self.config, self.credential()?)?);
        Ok(client)
    }
}

/// Dispatch a command to its implementation.
///
/// Config is resolved first so that a bad config file fails every command
/// the same way.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    let session = Session::new(config, cli.token);

    match cli.command {
        Command::Branches(args) => branches::cmd_branches(&session, args).await,
        Command::Tags(args) => tags::cmd_tags(&session, args).await,
        Command::Archive(args) => archive::cmd_archive(&session, args).await,
        Command::Serve(args) => serve::cmd_serve(&session, args).await,
    }
}

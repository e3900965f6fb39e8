//! Barc: bulk archival and deletion of hosted Git branches.
//!
//! This is the main entry point for the `barc` CLI. It parses arguments,
//! sets up logging and the async runtime, dispatches to the appropriate
//! command handler, and handles errors with proper exit codes.

mod archive;
mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod exit_codes;
mod github;
mod logging;
mod selection;
mod server;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start async runtime: {}", err);
            return ExitCode::from(exit_codes::USER_ERROR as u8);
        }
    };

    match runtime.block_on(commands::dispatch(cli)) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

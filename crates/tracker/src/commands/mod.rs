//! Command dispatch: bridges CLI args -> view-models -> output formatting.

pub mod browse;
pub mod config_cmd;
pub mod health;
pub mod issues;
pub mod util;

use tracker_core::IssueService;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    service: &IssueService,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Issues(args) => issues::handle(service, args, global).await,
        Command::Health => health::handle(service, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

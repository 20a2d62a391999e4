//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod boards;
pub mod catalog;
pub mod config_cmd;
pub mod download;
pub mod update;

use gibmac_core::ResourceKind;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a resource-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Update => update::handle(settings, global).await,
        Command::Catalog(args) => catalog::handle(&args, settings, global),
        Command::Boards(args) => boards::handle(&args, settings, global),
        Command::Download(args) => download::handle(&args, settings, global),
        // Menu, Config and Completions are handled before dispatch
        Command::Menu | Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command cannot be dispatched here".into(),
        )),
    }
}

/// Fail with a hint to run `gibmac update` when `kind` is not on disk.
fn require(settings: &Settings, kind: ResourceKind) -> Result<(), CliError> {
    if settings.paths.is_present(kind) {
        Ok(())
    } else {
        Err(CliError::MissingResource {
            resource: kind.to_string(),
            path: settings.paths.path_for(kind).display().to_string(),
        })
    }
}

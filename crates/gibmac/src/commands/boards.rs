//! `gibmac boards`: the board ID to release map from boards.json.

use serde::Serialize;
use tabled::Tabled;

use gibmac_core::{BoardMap, ResourceKind};

use crate::cli::{BoardsArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::require;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct BoardEntry {
    #[tabled(rename = "Board ID")]
    pub board_id: String,
    #[tabled(rename = "Release")]
    pub release: String,
}

/// Boards in document order, optionally restricted to one release.
pub fn entries(board_map: &BoardMap, release: Option<&str>) -> Vec<BoardEntry> {
    board_map
        .iter()
        .filter(|(_, r)| release.is_none_or(|want| r.eq_ignore_ascii_case(want)))
        .map(|(board_id, release)| BoardEntry {
            board_id: board_id.to_owned(),
            release: release.to_owned(),
        })
        .collect()
}

pub fn handle(args: &BoardsArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    require(settings, ResourceKind::Boards)?;
    let board_map = BoardMap::load(&settings.paths.path_for(ResourceKind::Boards));

    let entries = entries(&board_map, args.release.as_deref());
    if let Some(release) = args.release.as_ref().filter(|_| entries.is_empty()) {
        return Err(CliError::NotFound {
            what: "release".into(),
            query: release.clone(),
            list_command: "boards".into(),
        });
    }

    let out = output::render_list(&global.output, &entries, Clone::clone, |e| {
        e.board_id.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

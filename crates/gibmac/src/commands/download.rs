//! `gibmac download`: non-interactive download for a given board ID.

use std::ffi::OsStr;
use std::io::IsTerminal;

use dialoguer::Confirm;

use gibmac_core::{
    BoardMap, DownloadPlan, PLACEHOLDER_MLB, ResourceKind, SelectionState, Variant,
    selection::{parse_board_id, parse_mlb},
};

use crate::cli::{DownloadArgs, GlobalOpts, OsType};
use crate::config::Settings;
use crate::error::CliError;

use super::require;

impl From<OsType> for Variant {
    fn from(os_type: OsType) -> Self {
        match os_type {
            OsType::Default => Variant::Default,
            OsType::Latest => Variant::Latest,
        }
    }
}

/// Validate the flags into a complete target. The release is looked up in
/// `board_map`; a missing MLB uses the all-zero placeholder.
pub fn target(args: &DownloadArgs, board_map: &BoardMap) -> Result<SelectionState, CliError> {
    let board = parse_board_id(&args.board).map_err(|e| CliError::Validation {
        field: "board".into(),
        reason: e.to_string(),
    })?;
    let mlb = match args.mlb.as_deref() {
        Some(raw) => parse_mlb(raw).map_err(|e| CliError::Validation {
            field: "mlb".into(),
            reason: e.to_string(),
        })?,
        None => PLACEHOLDER_MLB.to_owned(),
    };
    Ok(SelectionState::resolved(
        board_map.release_for(&board),
        board,
        mlb,
        args.os_type.into(),
    ))
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: &DownloadArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let board_map = BoardMap::load(&settings.paths.path_for(ResourceKind::Boards));
    let state = target(args, &board_map)?;
    require(settings, ResourceKind::Macrecovery)?;

    let plan = DownloadPlan::from_selection(&state, settings.script_path(), &settings.output_dir)?;

    if !global.quiet {
        for line in state.summary_lines() {
            eprintln!("{line}");
        }
        eprintln!();
    }

    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::NonInteractiveRequiresYes {
                board: plan.board_id.clone(),
            });
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace {} and download the recovery image?",
                plan.output_dir.display()
            ))
            .default(true)
            .interact()
            .map_err(prompt_err)?;
        if !confirmed {
            return Ok(());
        }
    }

    let prep = plan.prepare_output_dir()?;
    if !global.quiet {
        if prep.removed_existing {
            eprintln!("Removed previous {}", plan.output_dir.display());
        }
        eprintln!("Running command:\n\n{}\n", plan.display_command());
    }

    plan.run(OsStr::new(&settings.python))
        .map_err(|e| CliError::from(e).with_python(&settings.python))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn args(argv: &[&str]) -> DownloadArgs {
        let mut full = vec!["gibmac", "download"];
        full.extend_from_slice(argv);
        let cli = Cli::parse_from(full);
        match cli.command {
            Some(Command::Download(args)) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn target_normalizes_flags() {
        let map = BoardMap::from_json_str(r#"{"Mac-A1B2C3D4":"12"}"#).unwrap();
        let state = target(&args(&["-b", "a1b2c3d4", "-m", "abc123", "--os-type", "latest"]), &map)
            .unwrap();
        assert_eq!(
            state,
            SelectionState::resolved("12", "Mac-A1B2C3D4", "00000000000ABC123", Variant::Latest)
        );
    }

    #[test]
    fn target_defaults_mlb_and_release() {
        let state = target(&args(&["-b", "Mac-1E7BA9F00D307329"]), &BoardMap::new()).unwrap();
        assert_eq!(state.target_os.as_deref(), Some("Unknown"));
        assert_eq!(state.target_mlb.as_deref(), Some(PLACEHOLDER_MLB));
        assert_eq!(state.variant, Variant::Default);
    }

    #[test]
    fn bad_identifiers_are_usage_errors() {
        let err = target(&args(&["-b", "Mac-123"]), &BoardMap::new()).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "board"));

        let err = target(&args(&["-b", "a1b2c3d4", "-m", "abc-123"]), &BoardMap::new()).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "mlb"));
    }
}

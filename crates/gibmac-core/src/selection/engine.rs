// ── Selection flows ──
//
// Each flow reads the current state for display, runs its prompts, and
// hands back a complete replacement state. Nothing is edited in place.

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{
    BoardMap, Catalog, DeviceRecord, PLACEHOLDER_MLB, SelectionState, Variant,
};
use crate::selection::prompt::{Prompted, Prompter, Screen, prompt_until};
use crate::selection::validate::{parse_board_id, parse_menu_index, parse_mlb};

const SELECT_PROMPT: &str = "Please select an option:  ";
const RETURN_PROMPT: &str = "Press [enter] to return...";

/// How a flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Backed out to the main menu; keep the current state.
    Unchanged,
    /// A new, complete target.
    Selected(SelectionState),
    /// The user asked to leave the program.
    Quit,
}

impl FlowOutcome {
    /// Fold the outcome into the session state. `None` means quit.
    pub fn apply(self, current: SelectionState) -> Option<SelectionState> {
        match self {
            Self::Unchanged => Some(current),
            Self::Selected(next) => Some(next),
            Self::Quit => None,
        }
    }
}

/// Drives the interactive target selection flows over a [`Prompter`].
pub struct SelectionEngine<'p, P: Prompter + ?Sized> {
    prompter: &'p mut P,
}

impl<'p, P: Prompter + ?Sized> SelectionEngine<'p, P> {
    pub fn new(prompter: &'p mut P) -> Self {
        Self { prompter }
    }

    /// Pick a release and device from the parsed `recovery_urls.txt`.
    pub fn select_from_catalog(
        &mut self,
        catalog: &Catalog,
        current: &SelectionState,
    ) -> Result<FlowOutcome, CoreError> {
        const TITLE: &str = "Select Target From recovery_urls.txt";

        if catalog.is_empty() {
            return self.no_data(
                TITLE,
                &[
                    "No macOS versions found!  Make sure recovery_urls.txt is in the data",
                    "directory!",
                ],
            );
        }

        let releases = catalog.newest_first();
        let screen = Screen::new(TITLE)
            .blank()
            .extend(current.summary_lines())
            .blank()
            .extend(releases.iter().enumerate().map(|(i, (label, records))| {
                format!("{:>2}. {label} ({} total)", i + 1, records.len())
            }))
            .with_nav_footer();

        let index = match prompt_until(&mut *self.prompter, &screen, SELECT_PROMPT, |s| {
            parse_menu_index(s, releases.len())
        })? {
            Prompted::Value(index) => index,
            Prompted::Back => return Ok(FlowOutcome::Unchanged),
            Prompted::Quit => return Ok(FlowOutcome::Quit),
        };
        let Some(&(label, records)) = releases.get(index) else {
            return Ok(FlowOutcome::Unchanged);
        };

        let record = if records.len() > 1 {
            match self.select_record(label, records)? {
                Prompted::Value(record) => record,
                Prompted::Back => return Ok(FlowOutcome::Unchanged),
                Prompted::Quit => return Ok(FlowOutcome::Quit),
            }
        } else if let Some(record) = records.first() {
            record
        } else {
            return Ok(FlowOutcome::Unchanged);
        };

        let next = resolve_catalog_choice(label, record);
        debug!(os = label, board = %record.board_id, "target selected from catalog");
        Ok(FlowOutcome::Selected(next))
    }

    fn select_record<'c>(
        &mut self,
        label: &str,
        records: &'c [DeviceRecord],
    ) -> Result<Prompted<&'c DeviceRecord>, CoreError> {
        let screen = Screen::new("Select Board ID and MLB")
            .blank()
            .line(format!("{label} has {} urls:", records.len()))
            .blank()
            .extend(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| format!("{}. {} - {}", i + 1, r.board_id, r.mlb)),
            )
            .with_nav_footer();

        let picked = prompt_until(&mut *self.prompter, &screen, SELECT_PROMPT, |s| {
            parse_menu_index(s, records.len())
        })?;
        Ok(match picked {
            Prompted::Value(index) => match records.get(index) {
                Some(record) => Prompted::Value(record),
                None => Prompted::Back,
            },
            Prompted::Back => Prompted::Back,
            Prompted::Quit => Prompted::Quit,
        })
    }

    /// Pick a release from `boards.json`; the first board listed for it
    /// becomes the target, with a placeholder MLB.
    pub fn select_from_board_map(
        &mut self,
        board_map: &BoardMap,
        current: &SelectionState,
    ) -> Result<FlowOutcome, CoreError> {
        const TITLE: &str = "Select Target macOS Version";

        if board_map.is_empty() {
            return self.no_data(
                TITLE,
                &[
                    "No macOS versions found!  Make sure boards.json is in the data directory,",
                    "and is a valid json file!",
                ],
            );
        }

        let releases = board_map.releases_desc();
        let screen = Screen::new(TITLE)
            .blank()
            .extend(current.summary_lines())
            .blank()
            .extend(
                releases
                    .iter()
                    .enumerate()
                    .map(|(i, label)| format!("{}. {label}", i + 1)),
            )
            .with_nav_footer();

        loop {
            let index = match prompt_until(&mut *self.prompter, &screen, SELECT_PROMPT, |s| {
                parse_menu_index(s, releases.len())
            })? {
                Prompted::Value(index) => index,
                Prompted::Back => return Ok(FlowOutcome::Unchanged),
                Prompted::Quit => return Ok(FlowOutcome::Quit),
            };
            let Some(label) = releases.get(index) else {
                continue;
            };
            if let Some(next) = resolve_board_map_choice(board_map, label) {
                debug!(os = label, board = ?next.target_board, "target selected from board map");
                return Ok(FlowOutcome::Selected(next));
            }
            warn!(os = label, "no board listed for release");
        }
    }

    /// Type a board id by hand. The release is looked up in the board map;
    /// MLB and OS type carry over.
    pub fn input_board_id(
        &mut self,
        board_map: &BoardMap,
        current: &SelectionState,
    ) -> Result<FlowOutcome, CoreError> {
        let screen = Screen::new("Input Custom Board ID")
            .blank()
            .extend(current.summary_lines())
            .blank()
            .line("Board IDs must begin with 'Mac-' followed by 8 or 16 hexadecimal digits.")
            .with_nav_footer();

        Ok(
            match prompt_until(
                &mut *self.prompter,
                &screen,
                "Please type the target Board ID:  ",
                parse_board_id,
            )? {
                Prompted::Value(board) => FlowOutcome::Selected(SelectionState {
                    target_os: Some(board_map.release_for(&board).to_owned()),
                    target_board: Some(board),
                    target_mlb: current.target_mlb.clone(),
                    variant: current.variant,
                }),
                Prompted::Back => FlowOutcome::Unchanged,
                Prompted::Quit => FlowOutcome::Quit,
            },
        )
    }

    /// Type an MLB by hand. Everything else carries over.
    pub fn input_mlb(&mut self, current: &SelectionState) -> Result<FlowOutcome, CoreError> {
        let screen = Screen::new("Input Custom MLB")
            .blank()
            .extend(current.summary_lines())
            .blank()
            .line("MLBs will be padded with 0s to 17 characters.")
            .with_nav_footer();

        Ok(
            match prompt_until(
                &mut *self.prompter,
                &screen,
                "Please type the target MLB:  ",
                parse_mlb,
            )? {
                Prompted::Value(mlb) => FlowOutcome::Selected(SelectionState {
                    target_mlb: Some(mlb),
                    ..current.clone()
                }),
                Prompted::Back => FlowOutcome::Unchanged,
                Prompted::Quit => FlowOutcome::Quit,
            },
        )
    }

    fn no_data(&mut self, title: &str, message: &[&str]) -> Result<FlowOutcome, CoreError> {
        let screen = Screen::new(title)
            .blank()
            .extend(message.iter().map(|l| (*l).to_owned()))
            .blank();
        self.prompter.show(&screen)?;
        self.prompter.pause(RETURN_PROMPT)?;
        Ok(FlowOutcome::Unchanged)
    }
}

/// Target for a record picked from the catalog.
pub fn resolve_catalog_choice(label: &str, record: &DeviceRecord) -> SelectionState {
    SelectionState::resolved(
        label,
        record.board_id.as_str(),
        record.mlb.as_str(),
        Variant::for_release(label),
    )
}

/// Target for a release picked from the board map: the first board listed
/// for it, with the placeholder MLB.
pub fn resolve_board_map_choice(board_map: &BoardMap, label: &str) -> Option<SelectionState> {
    let board = board_map.first_board_for(label)?;
    Some(SelectionState::resolved(
        label,
        board,
        PLACEHOLDER_MLB,
        Variant::for_release(label),
    ))
}

/// Flip the OS type between `default` and `latest`.
pub fn toggle_variant(current: &SelectionState) -> SelectionState {
    SelectionState {
        variant: current.variant.toggled(),
        ..current.clone()
    }
}

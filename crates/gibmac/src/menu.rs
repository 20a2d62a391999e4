//! Interactive main menu.
//!
//! Owns the session's `SelectionState` and the loaded resources, and hands
//! each menu choice to the matching selection flow, resource update, or
//! download. Errors from a single action are shown and acknowledged; only
//! quitting (or losing the terminal) ends the session.

use std::ffi::OsStr;

use tracing::{debug, warn};

use gibmac_core::resources::update_resources;
use gibmac_core::{
    CoreError, DownloadPlan, FlowOutcome, LoadedData, Prompter, ResourceKind, Screen,
    SelectionEngine, SelectionState, UpdateEvent, toggle_variant,
};

use crate::config::Settings;
use crate::output::presence;

const TITLE: &str = "gibmac";
const PROMPT: &str = "Please select an option:  ";

/// A main menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Update,
    Catalog,
    BoardMap,
    BoardId,
    Mlb,
    ToggleOsType,
    Download,
    Quit,
}

/// Map raw input to a menu entry. Entries that are hidden for `state`
/// are not accepted.
pub fn parse_main_choice(input: &str, state: &SelectionState) -> Option<MainChoice> {
    let choice = match input.trim() {
        "1" => MainChoice::Update,
        "2" => MainChoice::Catalog,
        "3" => MainChoice::BoardMap,
        "4" => MainChoice::BoardId,
        "5" if state.target_board.is_some() => MainChoice::Mlb,
        "6" => MainChoice::ToggleOsType,
        "7" if state.is_downloadable() => MainChoice::Download,
        other if other.eq_ignore_ascii_case("q") => MainChoice::Quit,
        _ => return None,
    };
    Some(choice)
}

/// The main menu: resource status, current target and the option list.
pub fn main_screen(
    settings: &Settings,
    data: &LoadedData,
    state: &SelectionState,
    color: bool,
) -> Screen {
    let paths = &settings.paths;
    let status = [
        ResourceKind::Macrecovery,
        ResourceKind::Boards,
        ResourceKind::RecoveryUrls,
    ]
    .into_iter()
    .map(|kind| {
        let present = presence(paths.is_present(kind), color);
        format!("{:>17}: {present}", kind.file_name())
    });

    let verb = if paths.all_present() {
        "Update"
    } else {
        "Install"
    };

    let mut screen = Screen::new(TITLE)
        .blank()
        .extend(status)
        .blank()
        .extend(state.summary_lines())
        .blank()
        .line(format!(
            "1. {verb} macrecovery.py, boards.json, and recovery_urls.txt"
        ))
        .line(format!(
            "2. Select Targets From recovery_urls.txt ({} available)",
            data.catalog.len()
        ))
        .line(format!(
            "3. Select Targets From boards.json ({} available)",
            data.board_map.release_count()
        ))
        .line("4. Input Custom Board ID");
    if state.target_board.is_some() {
        screen = screen.line("5. Input Custom MLB");
    }
    screen = screen.line("6. Toggle OS Type");
    if let Some(board) = state
        .target_board
        .as_deref()
        .filter(|_| state.is_downloadable())
    {
        screen = screen.line(format!("7. Download macOS Recovery For {board}"));
    }
    screen.blank().line("Q. Quit").blank()
}

enum Step {
    Continue,
    Quit,
}

/// One interactive session.
pub struct Session<'s, P: Prompter> {
    settings: &'s Settings,
    prompter: P,
    color: bool,
    state: SelectionState,
    data: LoadedData,
}

impl<'s, P: Prompter> Session<'s, P> {
    pub fn new(settings: &'s Settings, prompter: P, color: bool) -> Self {
        Self {
            settings,
            prompter,
            color,
            state: SelectionState::new(),
            data: settings.paths.load(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Run until the user quits. Fetches missing resources first.
    pub async fn run(&mut self) -> Result<(), CoreError> {
        if !self.settings.paths.all_present() {
            debug!("resources missing, installing before the first menu");
            let installed = self.update().await.map(|()| Step::Continue);
            self.guard(installed)?;
        }

        loop {
            let step = self.step().await;
            if let Step::Quit = self.guard(step)? {
                return Ok(());
            }
        }
    }

    /// Show a failed action's error and wait for acknowledgement. Prompt
    /// failures mean the terminal is gone and end the session.
    fn guard(&mut self, result: Result<Step, CoreError>) -> Result<Step, CoreError> {
        match result {
            Ok(step) => Ok(step),
            Err(err @ CoreError::Prompt { .. }) => Err(err),
            Err(err) => {
                warn!(error = %err, "menu action failed");
                let screen = Screen::new(TITLE)
                    .blank()
                    .line("An error occurred:")
                    .line(err.to_string())
                    .blank();
                self.prompter.show(&screen)?;
                self.prompter.pause("Press [enter] to continue...")?;
                Ok(Step::Continue)
            }
        }
    }

    async fn step(&mut self) -> Result<Step, CoreError> {
        let screen = main_screen(self.settings, &self.data, &self.state, self.color);
        self.prompter.show(&screen)?;
        let input = self.prompter.read_line(PROMPT)?;
        let Some(choice) = parse_main_choice(&input, &self.state) else {
            return Ok(Step::Continue);
        };
        debug!(?choice, "main menu");

        let outcome = match choice {
            MainChoice::Quit => return Ok(Step::Quit),
            MainChoice::Update => {
                self.update().await?;
                return Ok(Step::Continue);
            }
            MainChoice::Download => {
                self.download()?;
                return Ok(Step::Continue);
            }
            MainChoice::ToggleOsType => FlowOutcome::Selected(toggle_variant(&self.state)),
            MainChoice::Catalog => SelectionEngine::new(&mut self.prompter)
                .select_from_catalog(&self.data.catalog, &self.state)?,
            MainChoice::BoardMap => SelectionEngine::new(&mut self.prompter)
                .select_from_board_map(&self.data.board_map, &self.state)?,
            MainChoice::BoardId => SelectionEngine::new(&mut self.prompter)
                .input_board_id(&self.data.board_map, &self.state)?,
            MainChoice::Mlb => SelectionEngine::new(&mut self.prompter).input_mlb(&self.state)?,
        };

        match outcome.apply(self.state.clone()) {
            Some(next) => {
                self.state = next;
                Ok(Step::Continue)
            }
            None => Ok(Step::Quit),
        }
    }

    /// Fetch all resources, then reload them. A failed fetch is reported
    /// here and leaves the previous files in place.
    async fn update(&mut self) -> Result<(), CoreError> {
        let mut screen = Screen::new("Downloading Required Files").blank();
        self.prompter.show(&screen)?;

        let client = self.settings.client()?;
        let prompter = &mut self.prompter;
        let mut drawn = Ok(());
        let result = update_resources(
            &client,
            &self.settings.sources,
            &self.settings.paths,
            |event| {
                if let UpdateEvent::Started { kind, .. } = event {
                    screen.lines.push(format!("Downloading {kind}..."));
                    if drawn.is_ok() {
                        drawn = prompter.show(&screen);
                    }
                }
            },
        )
        .await;
        drawn?;

        if let Err(err) = result {
            screen = screen
                .blank()
                .line("Something went wrong:")
                .line(err.to_string())
                .blank();
            self.prompter.show(&screen)?;
            return self.prompter.pause("Press [enter] to return...");
        }

        self.data = self.settings.paths.load();
        let wait = self.settings.auto_return;
        screen = screen
            .blank()
            .line("Done.")
            .blank()
            .line(format!("Returning in {} seconds...", wait.as_secs()));
        self.prompter.show(&screen)?;
        tokio::time::sleep(wait).await;
        Ok(())
    }

    /// Recreate the output folder and run macrecovery.py for the current
    /// target.
    fn download(&mut self) -> Result<(), CoreError> {
        let plan = DownloadPlan::from_selection(
            &self.state,
            self.settings.script_path(),
            &self.settings.output_dir,
        )?;
        plan.check_script()?;

        let folder = plan
            .output_dir
            .file_name()
            .map_or_else(
                || plan.output_dir.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );

        let prep = plan.prepare_output_dir()?;
        let action = if prep.removed_existing {
            format!("{folder} already exists - removing...")
        } else {
            format!("Creating {folder}...")
        };

        let screen = Screen::new("Downloading macOS Recovery")
            .blank()
            .extend(self.state.summary_lines())
            .blank()
            .line(action)
            .blank()
            .line("Running command:")
            .blank()
            .line(plan.display_command())
            .blank();
        self.prompter.show(&screen)?;

        plan.run(OsStr::new(&self.settings.python))?;
        self.prompter.pause("Press [enter] to return...")
    }
}

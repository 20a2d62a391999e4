// ── Prompting ──

use tracing::debug;

use crate::error::CoreError;
use crate::selection::validate::InvalidInput;

/// A full menu screen: a title and the body lines under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub title: String,
    pub lines: Vec<String>,
}

impl Screen {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn blank(self) -> Self {
        self.line("")
    }

    pub fn extend(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Append the `M. Main Menu` / `Q. Quit` footer every prompt offers.
    pub fn with_nav_footer(self) -> Self {
        self.blank().line("M. Main Menu").line("Q. Quit").blank()
    }

    /// Rows needed to show the screen without scrolling.
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Terminal seam for the selection flows.
pub trait Prompter {
    /// Clear the terminal and draw `screen`.
    fn show(&mut self, screen: &Screen) -> Result<(), CoreError>;

    /// Read one raw line of input.
    fn read_line(&mut self, prompt: &str) -> Result<String, CoreError>;

    /// Print `message` and wait for the user to press enter.
    fn pause(&mut self, message: &str) -> Result<(), CoreError>;
}

/// What a line of menu input means before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput<'a> {
    Back,
    Quit,
    Entry(&'a str),
}

/// Recognise the `M`/`Q` navigation keys. Blank input yields `None`.
pub fn classify_input(raw: &str) -> Option<MenuInput<'_>> {
    let input = raw.trim();
    if input.is_empty() {
        None
    } else if input.eq_ignore_ascii_case("m") {
        Some(MenuInput::Back)
    } else if input.eq_ignore_ascii_case("q") {
        Some(MenuInput::Quit)
    } else {
        Some(MenuInput::Entry(input))
    }
}

/// Result of a validated prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompted<T> {
    Value(T),
    Back,
    Quit,
}

/// Show `screen` and re-prompt until `validate` accepts the input or the
/// user navigates away.
pub fn prompt_until<P, T>(
    prompter: &mut P,
    screen: &Screen,
    prompt: &str,
    validate: impl Fn(&str) -> Result<T, InvalidInput>,
) -> Result<Prompted<T>, CoreError>
where
    P: Prompter + ?Sized,
{
    loop {
        prompter.show(screen)?;
        let raw = prompter.read_line(prompt)?;
        let entry = match classify_input(&raw) {
            None => continue,
            Some(MenuInput::Back) => return Ok(Prompted::Back),
            Some(MenuInput::Quit) => return Ok(Prompted::Quit),
            Some(MenuInput::Entry(entry)) => entry,
        };
        match validate(entry) {
            Ok(value) => return Ok(Prompted::Value(value)),
            Err(reason) => debug!(screen = %screen.title, %reason, "input rejected"),
        }
    }
}

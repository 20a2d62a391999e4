//! Terminal-backed [`Prompter`]: clears and sizes the window with
//! crossterm, reads lines with dialoguer.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{self, Clear, ClearType, SetSize},
};
use dialoguer::Input;

use gibmac_core::{CoreError, Prompter, Screen};

/// Rows taken by the boxed title plus the prompt line under the body.
const CHROME_ROWS: usize = 5;

#[cfg(windows)]
const MIN_SIZE: (u16, u16) = (120, 30);
#[cfg(not(windows))]
const MIN_SIZE: (u16, u16) = (80, 24);

/// Menu I/O on the controlling terminal.
#[derive(Debug)]
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
        }
    }

    /// Grow the window so `rows` body lines fit, never below the minimum.
    /// Terminals that refuse to resize are left alone.
    fn fit(&self, rows: usize) {
        if !self.interactive {
            return;
        }
        let (min_cols, min_rows) = MIN_SIZE;
        let wanted = u16::try_from(rows + CHROME_ROWS).unwrap_or(u16::MAX);
        let (cols, current_rows) = terminal::size().unwrap_or(MIN_SIZE);
        let target = (cols.max(min_cols), wanted.max(min_rows));
        if target != (cols, current_rows) {
            let _ = execute!(io::stdout(), SetSize(target.0, target.1));
        }
    }

    fn clear(&self) -> io::Result<()> {
        if self.interactive {
            execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    /// Restore a sane terminal on the way out.
    pub fn finish(&mut self) {
        if self.interactive {
            let _ = self.clear();
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn show(&mut self, screen: &Screen) -> Result<(), CoreError> {
        self.fit(screen.height());
        self.clear().map_err(prompt_err)?;

        let width = usize::from(MIN_SIZE.0);
        let mut out = io::stdout().lock();
        for line in header_lines(&screen.title, width) {
            writeln!(out, "{line}").map_err(prompt_err)?;
        }
        for line in &screen.lines {
            writeln!(out, "{line}").map_err(prompt_err)?;
        }
        out.flush().map_err(prompt_err)
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, CoreError> {
        if self.interactive {
            return Input::<String>::new()
                .with_prompt(prompt.trim_end().trim_end_matches(':'))
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err);
        }

        // Piped input: plain line reads, EOF ends the session.
        print!("{prompt}");
        io::stdout().flush().map_err(prompt_err)?;
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(prompt_err)?;
        if read == 0 {
            return Err(CoreError::Prompt {
                message: "end of input".into(),
            });
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn pause(&mut self, message: &str) -> Result<(), CoreError> {
        self.read_line(message).map(|_| ())
    }
}

fn prompt_err(e: impl std::fmt::Display) -> CoreError {
    CoreError::Prompt {
        message: e.to_string(),
    }
}

/// Boxed, centered title drawn at the top of every screen.
pub fn header_lines(title: &str, width: usize) -> [String; 3] {
    let inner = width.saturating_sub(2).max(title.len() + 2);
    let border = "#".repeat(inner + 2);
    [border.clone(), format!("#{title:^inner$}#"), border]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_centered_in_a_box() {
        let [top, middle, bottom] = header_lines("gibmac", 20);
        assert_eq!(top, "#".repeat(20));
        assert_eq!(middle, "#      gibmac      #");
        assert_eq!(bottom, top);
    }

    #[test]
    fn header_grows_for_long_titles() {
        let [top, middle, _] = header_lines("Select Target From recovery_urls.txt", 10);
        assert_eq!(top.len(), middle.len());
        assert!(middle.starts_with("# Select"));
    }
}

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Fail early, leaving the terminal as it was, when there is no usable TTY.
pub fn check_terminal() -> Result<()> {
    enable_raw_mode().context("initializing terminal")?;
    disable_raw_mode().context("initializing terminal")?;
    Ok(())
}

pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("initializing terminal")?;
    undo_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
    .context("entering alternate screen")
}

pub fn teardown_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        Clear(ClearType::All),
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run `step`; if it fails, run `undo` before handing the error back.
fn undo_on_error<T, E>(step: impl FnOnce() -> Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    step().inspect_err(|_| undo())
}

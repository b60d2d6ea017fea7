//! TUI (Text User Interface) for the fuzzy choice list, plus the terminal-facing [`Host`].

mod app;
mod constants;
mod draw;
mod handlers;
mod host;

pub use host::TerminalHost;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use std::io;
use std::time::Duration;

use app::PickerState;
use draw::draw_picker;
use handlers::{PickerAction, handle_picker_key};

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Self {
        Self
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the picker until the user chooses (index into `labels`) or dismisses it (`None`).
pub fn pick(title: &str, labels: &[String]) -> io::Result<Option<usize>> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut picker = PickerState::new(title, labels);

    let choice = loop {
        terminal.draw(|f| draw_picker(f, f.area(), &mut picker))?;

        if !event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_picker_key(key.code, key.modifiers, &mut picker) {
                PickerAction::Close => break None,
                PickerAction::Select(i) => break Some(i),
                PickerAction::Keep => {}
            }
        }
    };

    terminal.show_cursor()?;
    Ok(choice)
}

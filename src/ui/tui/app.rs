// Main application loop for the TUI

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use crate::core::controller::Controller;

use super::input::handle_key_event;
use super::render::ui;
use super::state::{Action, AppState, LogLevel};

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn enter_tui() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave_tui(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Runs a confirmed action with the terminal handed back to the shell, so a
/// text-mode polkit agent can prompt for the password. Blocks until done.
fn run_suspended(terminal: &mut Tui, app: &mut AppState, action: Action) -> io::Result<()> {
    leave_tui(terminal)?;
    println!("{}: waiting for authorization...", action.confirm_title());

    app.perform(action);

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()
}

/// Run the ratatui app
pub fn run_app(controller: Controller) -> io::Result<()> {
    let refresh_interval = controller.config().refresh_interval();
    let mut terminal = enter_tui()?;

    let mut app = AppState::new(controller);
    app.add_log("Welcome to the GPU toggle control panel", LogLevel::Info);
    app.refresh();
    app.add_log("Press 's' to set up, 't' to toggle, 'r' to refresh, 'q' to quit.", LogLevel::Info);

    let result = event_loop(&mut terminal, &mut app, refresh_interval);

    // Restore the terminal even when the loop failed
    let teardown = leave_tui(&mut terminal);
    keep_first_error(result, teardown)
}

/// The loop's own error wins over a failed teardown, which is only logged
fn keep_first_error(result: io::Result<()>, teardown: io::Result<()>) -> io::Result<()> {
    match (result, teardown) {
        (Err(e), Err(teardown_err)) => {
            error!("Failed to restore terminal: {}", teardown_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), teardown) => teardown,
    }
}

fn event_loop(terminal: &mut Tui, app: &mut AppState, refresh_interval: Duration) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_refresh = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            info!("Quit requested");
            return Ok(());
        }

        if let Some(action) = app.pending_action.take() {
            debug!("Running {:?}", action);
            run_suspended(terminal, app, action)?;
            last_refresh = Instant::now();
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.refresh();
            last_refresh = Instant::now();
        }
    }
}

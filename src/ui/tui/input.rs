// Input handling for the TUI

use crossterm::event::{KeyCode, KeyModifiers};

use super::state::{Action, AppState, Dialog, LogLevel};

/// Handles key events for the application
pub fn handle_key_event(app: &mut AppState, key_code: KeyCode, modifiers: KeyModifiers) {
    if key_code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // An open dialog swallows every other key
    match app.dialog {
        Some(Dialog::Confirm(_)) => {
            match key_code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
                _ => {}
            }
            return;
        }
        Some(Dialog::Message { .. }) => {
            if matches!(key_code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dismiss_dialog();
            }
            return;
        }
        None => {}
    }

    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Char('s') => app.request(Action::Setup),
        KeyCode::Char('t') => app.request(Action::Toggle),
        KeyCode::Char('r') => {
            app.refresh();
            app.add_log("Status refreshed", LogLevel::Info);
        }
        _ => {}
    }
}

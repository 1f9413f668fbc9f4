// Application state management for the TUI

use ratatui::style::Color;
use tracing::{error, info, warn};

use crate::core::controller::Controller;
use crate::core::status::StatusReport;
use crate::ui::colors::Theme;

/// Keep the console feed at a reasonable size
const MAX_LOG_MESSAGES: usize = 100;

/// A styled log message for the console feed
#[derive(Clone)]
pub struct LogMessage {
    pub timestamp: String,
    pub text: String,
    pub level: LogLevel,
}

/// Log message levels with associated colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get the theme color for this log level
    pub fn color(&self, theme: &Theme) -> Color {
        match self {
            LogLevel::Info => theme.primary.into(),
            LogLevel::Success => theme.success.into(),
            LogLevel::Warning => theme.warning.into(),
            LogLevel::Error => theme.error.into(),
        }
    }
}

/// The two privileged actions, each behind a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Setup,
    Toggle,
}

impl Action {
    pub fn confirm_title(&self) -> &'static str {
        match self {
            Action::Setup => "Setup",
            Action::Toggle => "Toggle GPU",
        }
    }

    pub fn confirm_message(&self) -> &'static str {
        match self {
            Action::Setup => "Create or repair script and systemd service?",
            Action::Toggle => "Display session will restart.\nContinue?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Modal dialog currently covering the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm(Action),
    Message { severity: Severity, title: String, text: String },
}

/// Ratatui app state
pub struct AppState {
    pub title: String,
    pub should_quit: bool,
    pub controller: Controller,
    pub status: Option<StatusReport>,
    pub log_messages: Vec<LogMessage>,
    pub dialog: Option<Dialog>,
    /// Confirmed action waiting for the event loop to run it
    pub pending_action: Option<Action>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            title: "GPU Toggle Control Panel".to_string(),
            should_quit: false,
            controller,
            status: None,
            log_messages: Vec::new(),
            dialog: None,
            pending_action: None,
        }
    }

    /// Add a log message to the console feed
    pub fn add_log(&mut self, text: &str, level: LogLevel) {
        match level {
            LogLevel::Info | LogLevel::Success => info!("{}", text),
            LogLevel::Warning => warn!("{}", text),
            LogLevel::Error => error!("{}", text),
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.log_messages.push(LogMessage {
            timestamp,
            text: text.to_string(),
            level,
        });

        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// Re-reads the status and logs transitions worth noticing
    pub fn refresh(&mut self) {
        let report = self.controller.status();
        let previous = self.status.replace(report.clone());

        match previous {
            None => self.add_log(&report.gpu_mode_label(), LogLevel::Info),
            Some(previous) => {
                if previous.driver != report.driver {
                    self.add_log(
                        &format!("Driver changed: {} -> {}", previous.driver, report.driver),
                        LogLevel::Info,
                    );
                }
                if previous.service_active != report.service_active {
                    self.add_log(&report.service_state_label(), LogLevel::Info);
                }
            }
        }
    }

    pub fn toggle_enabled(&self) -> bool {
        self.status.as_ref().map_or(false, StatusReport::toggle_enabled)
    }

    /// Opens the confirmation dialog for an action
    pub fn request(&mut self, action: Action) {
        if action == Action::Toggle && !self.toggle_enabled() {
            self.add_log("Toggle unavailable: run Setup / Repair first.", LogLevel::Warning);
            return;
        }
        self.dialog = Some(Dialog::Confirm(action));
    }

    /// Answers the open confirmation dialog
    pub fn answer_confirm(&mut self, yes: bool) {
        if let Some(Dialog::Confirm(action)) = self.dialog.take() {
            if yes {
                self.pending_action = Some(action);
            } else {
                self.add_log(&format!("{} cancelled.", action.confirm_title()), LogLevel::Info);
            }
        }
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    /// Runs an action synchronously and reports its outcome
    pub fn perform(&mut self, action: Action) {
        match action {
            Action::Setup => match self.controller.setup() {
                Ok(()) => {
                    self.add_log("Setup completed.", LogLevel::Success);
                    self.show_message(Severity::Info, "Success", "Setup completed.");
                }
                Err(e) => {
                    self.add_log(&format!("Setup failed: {}", e), LogLevel::Error);
                    self.show_message(Severity::Error, "Error", "Setup failed.");
                }
            },
            Action::Toggle => match self.controller.toggle() {
                Ok(()) => self.add_log("GPU toggle finished.", LogLevel::Success),
                Err(e) => {
                    self.add_log(&format!("Toggle failed: {}", e), LogLevel::Error);
                    self.show_message(Severity::Error, "Error", "Toggle failed.");
                }
            },
        }
        self.refresh();
    }

    fn show_message(&mut self, severity: Severity, title: &str, text: &str) {
        self.dialog = Some(Dialog::Message {
            severity,
            title: title.to_string(),
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::command::testing::ScriptedRunner;
    use crate::core::config::ToggleConfig;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn app_with(dir: &TempDir, installed: bool, runner: ScriptedRunner) -> AppState {
        let config = ToggleConfig {
            script_path: dir.path().join("toggle.sh"),
            service_path: dir.path().join("toggle.service"),
            sysfs_pci_devices: dir.path().join("devices"),
            ..ToggleConfig::default()
        };
        if installed {
            fs::write(&config.script_path, "").unwrap();
            fs::write(&config.service_path, "").unwrap();
        }
        let mut app = AppState::new(Controller::new(config, Box::new(runner)));
        app.refresh();
        app
    }

    #[test]
    fn failed_setup_shows_error_only() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, false, ScriptedRunner::new(3, Some(1)));

        app.perform(Action::Setup);
        assert_eq!(
            app.dialog,
            Some(Dialog::Message {
                severity: Severity::Error,
                title: "Error".to_string(),
                text: "Setup failed.".to_string(),
            })
        );
        assert!(app.log_messages.iter().all(|m| m.level != LogLevel::Success));
    }

    #[test]
    fn failed_toggle_shows_error_only() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, true, ScriptedRunner::new(0, Some(126)));

        app.perform(Action::Toggle);
        assert!(matches!(
            app.dialog,
            Some(Dialog::Message { severity: Severity::Error, ref text, .. }) if text == "Toggle failed."
        ));
        assert!(app.log_messages.iter().all(|m| m.level != LogLevel::Success));
    }

    #[test]
    fn missing_helper_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, true, ScriptedRunner::new(0, None));

        app.perform(Action::Setup);
        assert!(matches!(app.dialog, Some(Dialog::Message { severity: Severity::Error, .. })));
    }

    #[test]
    fn successful_setup_shows_info() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, false, ScriptedRunner::new(3, Some(0)));

        app.perform(Action::Setup);
        assert!(matches!(
            app.dialog,
            Some(Dialog::Message { severity: Severity::Info, ref text, .. }) if text == "Setup completed."
        ));
    }

    #[test]
    fn successful_toggle_refreshes_without_dialog() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new(0, Some(0));
        let calls = runner.calls.clone();
        let mut app = app_with(&dir, true, runner);
        let before = calls.borrow().len();

        app.perform(Action::Toggle);
        assert!(app.dialog.is_none());
        // restart followed by a fresh is-active query
        let calls = calls.borrow();
        assert_eq!(calls.len(), before + 2);
        assert_eq!(calls[before].args, vec!["systemctl", "restart", "toggle-nvidia-vfio.service"]);
        assert_eq!(calls[before + 1].args[0], "is-active");
    }

    #[test]
    fn toggle_request_needs_installed_files() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, false, ScriptedRunner::new(3, Some(0)));

        app.request(Action::Toggle);
        assert!(app.dialog.is_none());
        assert_eq!(app.log_messages.last().map(|m| m.level), Some(LogLevel::Warning));

        app.request(Action::Setup);
        assert_eq!(app.dialog, Some(Dialog::Confirm(Action::Setup)));
    }

    #[test]
    fn declining_queues_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, true, ScriptedRunner::new(3, Some(0)));

        app.request(Action::Toggle);
        app.answer_confirm(false);
        assert!(app.dialog.is_none());
        assert!(app.pending_action.is_none());

        app.request(Action::Toggle);
        app.answer_confirm(true);
        assert_eq!(app.pending_action, Some(Action::Toggle));
    }

    #[test]
    fn log_is_bounded() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, false, ScriptedRunner::new(3, Some(0)));
        for i in 0..250 {
            app.add_log(&format!("line {}", i), LogLevel::Info);
        }
        assert_eq!(app.log_messages.len(), MAX_LOG_MESSAGES);
        assert_eq!(app.log_messages.last().unwrap().text, "line 249");
    }
}

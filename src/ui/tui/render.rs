// UI rendering functions for the TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::status::{DriverState, StatusReport};
use crate::ui::colors::Theme;
use super::state::{AppState, Dialog, Severity};

/// Main UI render function
pub fn ui(f: &mut Frame, app: &AppState) {
    let theme = Theme::default();
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(6), // System status
            Constraint::Length(3), // Actions
            Constraint::Min(3),    // Console log
        ])
        .split(size);

    render_title(f, app, chunks[0], &theme);
    render_status(f, app, chunks[1], &theme);
    render_actions(f, app, chunks[2], &theme);
    render_console(f, app, chunks[3], &theme);

    if let Some(dialog) = &app.dialog {
        render_dialog(f, dialog, &theme);
    }
}

fn rounded_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .border_style(Style::default().fg(color))
}

/// Render the title bar
fn render_title(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let block = rounded_block(format!(" ✨ {} ✨ ", app.title), theme.primary.into());

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "NVIDIA ⇄ VFIO passthrough switch",
        Style::default().fg(theme.accent.into()).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(subtitle, area);
}

/// Render the system status panel
fn render_status(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let block = rounded_block(" System Status ".to_string(), theme.secondary.into());

    let lines = match &app.status {
        Some(report) => status_lines(report, theme),
        None => vec![Line::from(Span::styled(
            "Status not collected yet",
            Style::default().fg(theme.muted.into()),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn status_lines<'a>(report: &StatusReport, theme: &Theme) -> Vec<Line<'a>> {
    let text = Style::default().fg(theme.text.into());
    let mode_color = match report.driver {
        DriverState::Vfio => theme.success,
        DriverState::Nvidia(_) => theme.secondary,
        DriverState::Other(_) => theme.error,
    };

    vec![
        Line::from(Span::styled(
            report.gpu_mode_label(),
            Style::default().fg(mode_color.into()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(report.script_label(), text)),
        Line::from(Span::styled(report.service_file_label(), text)),
        Line::from(Span::styled(report.service_state_label(), text)),
    ]
}

/// Render the action bar; the toggle entry is dimmed while disabled
fn render_actions(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let key = Style::default().fg(theme.accent.into()).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(theme.text.into());
    let disabled = Style::default().fg(theme.muted.into()).add_modifier(Modifier::DIM);

    let (toggle_key, toggle_label) = if app.toggle_enabled() {
        (key, label)
    } else {
        (disabled, disabled)
    };

    let line = Line::from(vec![
        Span::styled("[s]", key),
        Span::styled(" Setup / Repair   ", label),
        Span::styled("[t]", toggle_key),
        Span::styled(" Toggle GPU   ", toggle_label),
        Span::styled("[r]", key),
        Span::styled(" Refresh   ", label),
        Span::styled("[q]", key),
        Span::styled(" Quit", label),
    ]);

    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(rounded_block(" Actions ".to_string(), theme.accent.into()));
    f.render_widget(paragraph, area);
}

/// Render the console feed, newest entries at the bottom
fn render_console(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.log_messages.len().saturating_sub(visible);

    let items: Vec<ListItem> = app
        .log_messages
        .iter()
        .skip(skip)
        .map(|msg| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", msg.timestamp), Style::default().fg(theme.muted.into())),
                Span::styled(msg.text.clone(), Style::default().fg(msg.level.color(theme))),
            ]))
        })
        .collect();

    let list = List::new(items).block(rounded_block(" Console ".to_string(), theme.primary.into()));
    f.render_widget(list, area);
}

/// Render a modal dialog centered over the panel
fn render_dialog(f: &mut Frame, dialog: &Dialog, theme: &Theme) {
    let (title, body, color, hint) = match dialog {
        Dialog::Confirm(action) => (
            action.confirm_title(),
            action.confirm_message(),
            theme.accent,
            "[y] Yes   [n] No",
        ),
        Dialog::Message { severity, title, text } => (
            title.as_str(),
            text.as_str(),
            match severity {
                Severity::Info => theme.success,
                Severity::Error => theme.error,
            },
            "[Enter] OK",
        ),
    };

    let mut lines: Vec<Line> = body
        .lines()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text.into()))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(color.into()).add_modifier(Modifier::BOLD),
    )));

    let content_width = body
        .lines()
        .chain([hint, title])
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0) as u16;
    let area = centered_rect(content_width + 6, lines.len() as u16 + 2, f.size());

    let block = rounded_block(format!(" {} ", title), color.into());
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// A rectangle of the given size centered in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

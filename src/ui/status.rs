use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::sync::Pane;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let position = match model.focus {
        Pane::Editor => {
            let cursor = model.editor.cursor();
            format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1)
        }
        Pane::Preview => format!("[{}%]", model.preview_viewport.scroll_percent()),
    };
    let storage = if model.store.is_engaged() {
        ""
    } else {
        "  [not saved]"
    };

    let status = format!(
        " splitmark  [{}]  theme: {}  {}{}  F1:help",
        model.mode.label(),
        model.theme,
        position,
        storage
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}

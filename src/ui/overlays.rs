use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::theme::selectable_themes;

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White))
}

pub fn theme_picker_rect(area: Rect) -> Rect {
    let height = area.height.saturating_sub(4).clamp(6, 20);
    centered_popup_rect(36, height, area)
}

pub fn render_theme_picker(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(selected) = model.theme_picker else {
        return;
    };
    let popup = theme_picker_rect(area);
    let rows = usize::from(popup.height.saturating_sub(2));
    let total = selectable_themes().count();
    // Keep the highlight roughly centered.
    let start = selected
        .saturating_sub(rows / 2)
        .min(total.saturating_sub(rows));

    let lines: Vec<Line> = selectable_themes()
        .enumerate()
        .skip(start)
        .take(rows)
        .map(|(idx, name)| {
            let current = if name == model.theme { "*" } else { " " };
            let text = format!("{current} {name}");
            if idx == selected {
                Line::styled(text, Style::default().reversed())
            } else {
                Line::raw(text)
            }
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(" Theme (Enter selects) ")),
        popup,
    );
}

pub fn render_import_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(prompt) = model.import_prompt.as_deref() else {
        return;
    };
    let width = area.width.saturating_sub(10).clamp(30, 80);
    let popup = centered_popup_rect(width, 5, area);
    let lines = vec![
        Line::from(vec![
            Span::raw(prompt.to_string()),
            Span::styled(" ", Style::default().bg(Color::White)),
        ]),
        Line::styled(
            ".md or .txt · Enter opens · Esc cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(popup_block(" Open file ")), popup);
}

/// Help text, including where config is read from.
pub fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    vec![
        Line::styled("Panes", section_style),
        Line::raw("  Tab                 Switch focus"),
        Line::raw("  Ctrl-e              Toggle edit mode"),
        Line::raw("  Ctrl-r              Toggle reader mode"),
        Line::raw("  Mouse wheel         Scroll (panes stay in sync)"),
        Line::raw(""),
        Line::styled("Editor", section_style),
        Line::raw("  Arrows, Home/End    Navigate"),
        Line::raw("  Ctrl+Left/Right     Word movement"),
        Line::raw("  Ctrl+Home/End       Buffer start / end"),
        Line::raw("  PageUp/PageDown     Page"),
        Line::raw(""),
        Line::styled("Preview", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  Space / b           Page down / up"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw(""),
        Line::styled("Document", section_style),
        Line::raw("  Ctrl-o              Open .md / .txt"),
        Line::raw("  Ctrl-s              Export export.html"),
        Line::raw("  Ctrl-t              Choose theme"),
        Line::raw("  Ctrl-n              Reset to default"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  F1                  Toggle help"),
        Line::raw("  Ctrl-q / Ctrl-c     Quit"),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
        Line::raw(format!("  Export dir: {}", model.export_dir.display())),
    ]
}

fn help_popup_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(10);
    centered_popup_rect(popup_width, popup_height, area)
}

/// Rows of help text visible inside the popup; the last row is the footer hint.
fn help_content_height(inner: Rect) -> usize {
    usize::from(inner.height.saturating_sub(1))
}

/// Largest help scroll offset for the current terminal size.
pub fn help_max_scroll(model: &Model) -> usize {
    let (width, height) = model.terminal_size();
    let inner = popup_block(" Help ").inner(help_popup_rect(Rect::new(0, 0, width, height)));
    help_lines(model)
        .len()
        .saturating_sub(help_content_height(inner))
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = help_popup_rect(area);

    let all_lines = help_lines(model);
    let block = popup_block(" Help ");
    let inner = block.inner(popup);

    let content_height = help_content_height(inner);
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);
    let end = (scroll + content_height).min(all_lines.len());

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    let content_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    frame.render_widget(Paragraph::new(all_lines[scroll..end].to_vec()), content_area);

    let footer_area = Rect {
        y: inner.y + inner.height.saturating_sub(1),
        height: inner.height.min(1),
        ..inner
    };
    let footer = Line::styled(
        "j/k scroll \u{2502} any other key closes",
        Style::default().fg(Color::Indexed(245)),
    );
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

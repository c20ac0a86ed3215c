use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{DisplayMode, Model};
use crate::editor::EditorBuffer;
use crate::sync::Pane;

use super::{CENTERED_MIN_WIDTH, CENTERED_WIDTH_PERCENT, PREVIEW_PADDING, overlays, status, style};

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    pub editor: Option<Rect>,
    pub preview: Option<Rect>,
    pub status: Rect,
}

/// Lay out the panes for `mode`: side by side in split mode, a single
/// centered column otherwise. The last row is the status bar.
pub fn pane_areas(area: Rect, mode: DisplayMode) -> PaneAreas {
    let body = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    match mode {
        DisplayMode::Split => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(body);
            PaneAreas {
                editor: Some(columns[0]),
                preview: Some(columns[1]),
                status,
            }
        }
        DisplayMode::EditOnly => PaneAreas {
            editor: Some(centered_column(body)),
            preview: None,
            status,
        },
        DisplayMode::ReaderOnly => PaneAreas {
            editor: None,
            preview: Some(centered_column(body)),
            status,
        },
    }
}

fn centered_column(area: Rect) -> Rect {
    let share = u32::from(area.width) * u32::from(CENTERED_WIDTH_PERCENT) / 100;
    let width = u16::try_from(share)
        .unwrap_or(area.width)
        .max(CENTERED_MIN_WIDTH)
        .min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Area inside a pane's border.
pub const fn pane_inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// Wrap width for preview text inside a pane of `inner_width` columns.
pub const fn preview_text_width(inner_width: u16) -> u16 {
    let width = inner_width.saturating_sub(2 * PREVIEW_PADDING);
    if width == 0 { 1 } else { width }
}

/// Columns taken by line numbers plus one space.
pub const fn gutter_width(total_lines: usize) -> u16 {
    let mut digits = 1;
    let mut rest = total_lines / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits + 1
}

/// Columns left for editor text once the gutter is drawn.
pub fn editor_text_width(inner_width: u16, total_lines: usize) -> usize {
    usize::from(inner_width.saturating_sub(gutter_width(total_lines))).max(1)
}

fn cell_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Chars hidden off the left edge so the cursor cell stays inside
/// `text_width` terminal cells. Applied to every visible line.
pub fn editor_shift(editor: &EditorBuffer, text_width: usize) -> usize {
    let cursor = editor.cursor();
    let chars: Vec<char> = editor
        .line(cursor.line)
        .unwrap_or_default()
        .chars()
        .collect();
    let col = cursor.col.min(chars.len());
    let cursor_cell = chars.get(col).map_or(1, |&ch| cell_width(ch).max(1));
    let mut used = chars[..col].iter().copied().map(cell_width).sum::<usize>() + cursor_cell;
    let mut shift = 0;
    while used > text_width && shift < col {
        used -= cell_width(chars[shift]);
        shift += 1;
    }
    shift
}

/// Char index under terminal cell `cell` of `text`; past the end maps to
/// the char count. A wide char owns all of its cells.
pub fn column_at_cell(text: &str, cell: usize) -> usize {
    let mut start = 0;
    for (idx, ch) in text.chars().enumerate() {
        let width = cell_width(ch);
        if width > 0 && cell < start + width {
            return idx;
        }
        start += width;
    }
    text.chars().count()
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let areas = pane_areas(area, model.mode);

    if let Some(editor) = areas.editor {
        render_editor(model, frame, editor);
    }
    if let Some(preview) = areas.preview {
        render_preview(model, frame, preview);
    }
    status::render_status_bar(model, frame, areas.status);
    if model.active_toast().is_some() && areas.status.y > area.y {
        let toast_area = Rect {
            y: areas.status.y - 1,
            ..areas.status
        };
        status::render_toast_bar(model, frame, toast_area);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.theme_picker.is_some() {
        overlays::render_theme_picker(model, frame, area);
    } else if model.import_prompt.is_some() {
        overlays::render_import_prompt(model, frame, area);
    }
}

fn pane_block(title: &str, focused: bool, palette: Option<crate::theme::Palette>) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style::border_style(focused, palette))
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let palette = model.themes.palette(&model.theme);
    let (text_style, gutter_style, cursor_style) = style::editor_styles(palette);
    let focused = model.focus == Pane::Editor;
    let block = pane_block(" Editor ", focused, palette).style(text_style);
    let inner = block.inner(area);

    let buf = &model.editor;
    let gutter = gutter_width(buf.line_count());
    let text_width = editor_text_width(inner.width, buf.line_count());
    let cursor = buf.cursor();
    let shift = editor_shift(buf, text_width);

    let mut content: Vec<Line> = Vec::new();
    for line_idx in model.editor_viewport.visible_range() {
        let text: Vec<char> = buf
            .line(line_idx)
            .unwrap_or_default()
            .chars()
            .skip(shift)
            .collect();
        let number = format!(
            "{:>width$} ",
            line_idx + 1,
            width = usize::from(gutter.saturating_sub(1))
        );
        let mut spans = vec![Span::styled(number, gutter_style)];

        if focused && line_idx == cursor.line {
            let col = (cursor.col - shift).min(text.len());
            let before: String = text[..col].iter().collect();
            let at: String = text.get(col).map_or_else(|| " ".to_string(), char::to_string);
            let after: String = text.get(col + 1..).unwrap_or_default().iter().collect();
            spans.push(Span::raw(before));
            spans.push(Span::styled(at, cursor_style));
            spans.push(Span::raw(after));
        } else {
            spans.push(Span::raw(text.into_iter().collect::<String>()));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Pane::Preview;
    let block = pane_block(" Preview ", focused, None)
        .padding(Padding::horizontal(PREVIEW_PADDING));

    let viewport = &model.preview_viewport;
    let content: Vec<Line> = model
        .preview
        .visible_lines(viewport.offset(), usize::from(viewport.height()))
        .iter()
        .map(|line| {
            let base = style::style_for_line_kind(line.kind());
            Line::from(
                line.spans()
                    .iter()
                    .map(|span| {
                        Span::styled(
                            span.text().to_string(),
                            style::style_for_inline(base, span.style()),
                        )
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::model::DisplayMode;
use crate::app::{App, Message, Model};
use crate::editor::Motion;
use crate::sync::Pane;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: isize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => Self::handle_paste(text, model),
            Event::Resize(width, height) => {
                tracing::trace!(width, height, "resize queued");
                resize_debouncer.queue(*width, *height, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScroll(1)),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScroll(-1)),
                _ => Some(Message::HideHelp),
            };
        }
        if model.theme_picker.is_some() {
            return Self::handle_theme_picker_key(key);
        }
        if let Some(prompt) = model.import_prompt.as_ref() {
            return Self::handle_import_key(key, prompt);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl {
            match key.code {
                KeyCode::Char('q' | 'c') => return Some(Message::Quit),
                KeyCode::Char('e') => return Some(Message::ToggleEditMode),
                KeyCode::Char('r') => return Some(Message::ToggleReaderMode),
                KeyCode::Char('s') => return Some(Message::ExportHtml),
                KeyCode::Char('o') => return Some(Message::StartImport),
                KeyCode::Char('t') => return Some(Message::OpenThemePicker),
                KeyCode::Char('n') => return Some(Message::ResetToDefault),
                _ => {}
            }
        }
        match key.code {
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::FocusNext),
            _ => {}
        }

        match model.focus {
            Pane::Editor => Self::handle_editor_key(key, model),
            Pane::Preview => Self::handle_preview_key(key, model),
        }
    }

    fn handle_editor_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = model.editor_viewport.page();
        match key.code {
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::EditorInsertChar(c))
            }
            KeyCode::Enter => Some(Message::EditorNewline),
            KeyCode::Backspace => Some(Message::EditorBackspace),
            KeyCode::Delete => Some(Message::EditorDelete),
            KeyCode::Left if ctrl => Some(Message::EditorMove(Motion::WordLeft)),
            KeyCode::Right if ctrl => Some(Message::EditorMove(Motion::WordRight)),
            KeyCode::Home if ctrl => Some(Message::EditorMove(Motion::BufferStart)),
            KeyCode::End if ctrl => Some(Message::EditorMove(Motion::BufferEnd)),
            KeyCode::Left => Some(Message::EditorMove(Motion::Left)),
            KeyCode::Right => Some(Message::EditorMove(Motion::Right)),
            KeyCode::Up => Some(Message::EditorMove(Motion::Up)),
            KeyCode::Down => Some(Message::EditorMove(Motion::Down)),
            KeyCode::Home => Some(Message::EditorMove(Motion::LineStart)),
            KeyCode::End => Some(Message::EditorMove(Motion::LineEnd)),
            KeyCode::PageUp => Some(Message::EditorMove(Motion::PageUp(page))),
            KeyCode::PageDown => Some(Message::EditorMove(Motion::PageDown(page))),
            _ => None,
        }
    }

    fn handle_preview_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let page = isize::try_from(model.preview_viewport.page()).unwrap_or(isize::MAX);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::Scroll(Pane::Preview, 1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::Scroll(Pane::Preview, -1)),
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::Scroll(Pane::Preview, page)),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::Scroll(Pane::Preview, -page)),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::ScrollToTop(Pane::Preview)),
            KeyCode::Char('G') | KeyCode::End => Some(Message::ScrollToBottom(Pane::Preview)),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            _ => None,
        }
    }

    fn handle_theme_picker_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::ThemePickerMove(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::ThemePickerMove(1)),
            KeyCode::PageUp => Some(Message::ThemePickerMove(-10)),
            KeyCode::PageDown => Some(Message::ThemePickerMove(10)),
            KeyCode::Home => Some(Message::ThemePickerMove(isize::MIN)),
            KeyCode::End => Some(Message::ThemePickerMove(isize::MAX)),
            KeyCode::Enter => Some(Message::ConfirmThemePicker),
            KeyCode::Esc => Some(Message::CloseThemePicker),
            _ => None,
        }
    }

    fn handle_import_key(key: KeyEvent, prompt: &str) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::CancelImport),
            KeyCode::Enter => {
                let path = prompt.trim();
                if path.is_empty() {
                    Some(Message::CancelImport)
                } else {
                    Some(Message::ImportFile(PathBuf::from(path)))
                }
            }
            KeyCode::Backspace => {
                let mut next = prompt.to_string();
                next.pop();
                Some(Message::ImportInput(next))
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut next = prompt.to_string();
                next.push(c);
                Some(Message::ImportInput(next))
            }
            _ => None,
        }
    }

    fn handle_paste(text: &str, model: &Model) -> Option<Message> {
        if let Some(prompt) = model.import_prompt.as_ref() {
            let line = text.lines().next().unwrap_or_default();
            return Some(Message::ImportInput(format!("{prompt}{line}")));
        }
        (model.focus == Pane::Editor).then(|| Message::EditorPaste(text.to_string()))
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.overlay_active() {
            return match mouse.kind {
                MouseEventKind::ScrollDown if model.theme_picker.is_some() => {
                    Some(Message::ThemePickerMove(1))
                }
                MouseEventKind::ScrollUp if model.theme_picker.is_some() => {
                    Some(Message::ThemePickerMove(-1))
                }
                _ => None,
            };
        }

        let pane = pane_at(model, mouse.column, mouse.row)?;
        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Message::Scroll(pane, WHEEL_LINES)),
            MouseEventKind::ScrollUp => Some(Message::Scroll(pane, -WHEEL_LINES)),
            MouseEventKind::Down(MouseButton::Left) => match pane {
                Pane::Editor => editor_click(model, mouse.column, mouse.row),
                Pane::Preview => Some(Message::Focus(Pane::Preview)),
            },
            _ => None,
        }
    }
}

fn screen(model: &Model) -> Rect {
    let (width, height) = model.terminal_size();
    Rect::new(0, 0, width, height)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Pane under a screen position, if any.
pub(super) fn pane_at(model: &Model, column: u16, row: u16) -> Option<Pane> {
    let areas = crate::ui::pane_areas(screen(model), model.mode);
    if areas.editor.is_some_and(|rect| contains(rect, column, row)) {
        Some(Pane::Editor)
    } else if areas.preview.is_some_and(|rect| contains(rect, column, row)) {
        Some(Pane::Preview)
    } else {
        None
    }
}

fn editor_click(model: &Model, column: u16, row: u16) -> Option<Message> {
    if model.mode == DisplayMode::ReaderOnly {
        return None;
    }
    let areas = crate::ui::pane_areas(screen(model), model.mode);
    let inner = crate::ui::pane_inner(areas.editor?);
    if !contains(inner, column, row) {
        return Some(Message::Focus(Pane::Editor));
    }
    let total = model.editor.line_count();
    let gutter = crate::ui::gutter_width(total);
    let line = model.editor_viewport.offset() + usize::from(row - inner.y);
    let cell = usize::from(column.saturating_sub(inner.x + gutter));
    let shift = crate::ui::editor_shift(
        &model.editor,
        crate::ui::editor_text_width(inner.width, total),
    );
    let visible: String = model
        .editor
        .line(line)
        .unwrap_or_default()
        .chars()
        .skip(shift)
        .collect();
    let col = shift + crate::ui::column_at_cell(&visible, cell);
    Some(Message::EditorMoveTo(line, col))
}

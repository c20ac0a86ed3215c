use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use super::*;
use crate::app::{DisplayMode, Message, Model, update};
use crate::editor::{EditorBuffer, Motion};
use crate::storage::{MemoryStorage, StateStore};
use crate::theme::ThemeRegistry;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn model_with_text(text: &str) -> Model {
    let storage = MemoryStorage::new().seed("markdown-text", text);
    Model::new(
        StateStore::new(Box::new(storage)),
        ThemeRegistry::default(),
        (80, 24),
    )
}

fn draw(model: &Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|c| c.symbol()).collect()
}

fn row(model: &Model, y: u16) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

#[test]
fn test_split_layout_halves_the_body() {
    let areas = pane_areas(Rect::new(0, 0, 80, 24), DisplayMode::Split);
    let editor = areas.editor.unwrap();
    let preview = areas.preview.unwrap();
    assert_eq!(editor.width, 40);
    assert_eq!(preview.x, 40);
    assert_eq!(editor.height, 23);
    assert_eq!(areas.status, Rect::new(0, 23, 80, 1));
}

#[test]
fn test_single_pane_modes_center_one_column() {
    let areas = pane_areas(Rect::new(0, 0, 120, 30), DisplayMode::ReaderOnly);
    assert!(areas.editor.is_none());
    let preview = areas.preview.unwrap();
    assert_eq!(preview.width, 84);
    assert_eq!(preview.x, 18);

    let areas = pane_areas(Rect::new(0, 0, 120, 30), DisplayMode::EditOnly);
    assert!(areas.preview.is_none());
    assert_eq!(areas.editor.unwrap().width, 84);
}

#[test]
fn test_centered_column_keeps_minimum_width() {
    let areas = pane_areas(Rect::new(0, 0, 70, 24), DisplayMode::EditOnly);
    assert_eq!(areas.editor.unwrap().width, 60);

    let narrow = pane_areas(Rect::new(0, 0, 40, 24), DisplayMode::EditOnly);
    assert_eq!(narrow.editor.unwrap(), Rect::new(0, 0, 40, 23));
}

#[test]
fn test_pane_inner_saturates_on_tiny_areas() {
    assert_eq!(pane_inner(Rect::new(0, 0, 10, 5)), Rect::new(1, 1, 8, 3));
    assert_eq!(pane_inner(Rect::new(0, 0, 1, 1)).width, 0);
}

#[test]
fn test_preview_text_width_never_zero() {
    assert_eq!(preview_text_width(10), 8);
    assert_eq!(preview_text_width(2), 1);
    assert_eq!(preview_text_width(0), 1);
}

#[test]
fn test_gutter_width_tracks_digits() {
    assert_eq!(gutter_width(0), 2);
    assert_eq!(gutter_width(9), 2);
    assert_eq!(gutter_width(10), 3);
    assert_eq!(gutter_width(1234), 5);
}

#[test]
fn test_render_shows_both_panes_in_split_mode() {
    let model = model_with_text("# Hello\n\nsome body text");
    let content = draw(&model);
    assert!(content.contains("Editor"));
    assert!(content.contains("Preview"));
    assert!(content.contains("# Hello"), "editor shows raw source");
    assert!(content.contains("some body text"));
}

#[test]
fn test_reader_mode_hides_editor() {
    let model = update(model_with_text("plain words"), Message::ToggleReaderMode);
    let content = draw(&model);
    assert!(!content.contains("Editor"));
    assert!(content.contains("Preview"));
    assert!(content.contains("plain words"));
}

#[test]
fn test_editor_shows_line_numbers() {
    let model = model_with_text("first\nsecond");
    let content = draw(&model);
    assert!(content.contains("1 first"));
    assert!(content.contains("2 second"));
}

#[test]
fn test_status_bar_shows_mode_theme_and_position() {
    let model = model_with_text("abc");
    let status = row(&model, 23);
    assert!(status.contains("[split]"));
    assert!(status.contains("theme: default"));
    assert!(status.contains("Ln 1, Col 1"));
    assert!(status.contains("F1:help"));
}

#[test]
fn test_status_bar_flags_unsaved_session() {
    let model = Model::default();
    assert!(row(&model, 23).contains("[not saved]"));
    let saved = model_with_text("abc");
    assert!(!row(&saved, 23).contains("[not saved]"));
}

#[test]
fn test_toast_renders_above_status_bar() {
    let model = update(
        model_with_text("abc"),
        Message::ImportFailed("Open failed: nope".to_string()),
    );
    let toast = row(&model, 22);
    assert!(toast.contains("[error] Open failed: nope"));
}

#[test]
fn test_help_overlay_renders() {
    let model = update(model_with_text("abc"), Message::ToggleHelp);
    let content = draw(&model);
    assert!(content.contains("Help"));
    assert!(content.contains("Toggle edit mode"));
}

#[test]
fn test_help_lines_list_config_paths() {
    let mut model = model_with_text("abc");
    model.config_global_path = Some("/etc/splitmark/conf".into());
    let text: String = help_lines(&model)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    assert!(text.contains("Global: /etc/splitmark/conf"));
    assert!(text.contains("Local override: <none>"));
}

#[test]
fn test_theme_picker_highlights_current_theme() {
    let model = update(
        model_with_text("abc"),
        Message::SelectTheme("dracula".to_string()),
    );
    let model = update(model, Message::OpenThemePicker);
    let content = draw(&model);
    assert!(content.contains("Theme"));
    assert!(content.contains("* dracula"));
}

#[test]
fn test_theme_picker_fits_small_terminal() {
    let rect = theme_picker_rect(Rect::new(0, 0, 20, 8));
    assert!(rect.width <= 20);
    assert!(rect.height <= 8);
}

#[test]
fn test_import_prompt_shows_typed_path() {
    let model = update(model_with_text("abc"), Message::StartImport);
    let model = update(model, Message::ImportInput("notes.md".to_string()));
    let content = draw(&model);
    assert!(content.contains("Open file"));
    assert!(content.contains("notes.md"));
}

#[test]
fn test_render_survives_tiny_terminal() {
    let model = update(model_with_text("# Title\n\nbody"), Message::Resize(3, 2));
    let backend = TestBackend::new(3, 2);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();
}

#[test]
fn test_editor_shift_counts_terminal_cells() {
    let mut buf = EditorBuffer::from_text(&"日".repeat(30));
    buf.apply(Motion::LineEnd);
    // 60 cells of text plus the cursor cell, 36 cells available.
    assert_eq!(editor_shift(&buf, 36), 13);

    let mut narrow = EditorBuffer::from_text(&"a".repeat(30));
    narrow.apply(Motion::LineEnd);
    assert_eq!(editor_shift(&narrow, 36), 0);
}

#[test]
fn test_wide_line_keeps_cursor_on_screen() {
    let model = model_with_text(&"語".repeat(40));
    let model = update(model, Message::EditorMove(Motion::LineEnd));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    // The cursor is a blank cell past the text, inside the editor's right border.
    let cursor_cells = (1..39u16)
        .filter(|&x| buffer[(x, 1)].bg == ratatui::style::Color::White)
        .count();
    assert_eq!(cursor_cells, 1);
}

#[test]
fn test_column_at_cell_maps_wide_chars() {
    assert_eq!(column_at_cell("日本語abc", 0), 0);
    assert_eq!(column_at_cell("日本語abc", 1), 0);
    assert_eq!(column_at_cell("日本語abc", 2), 1);
    assert_eq!(column_at_cell("日本語abc", 6), 3);
    assert_eq!(column_at_cell("日本語abc", 50), 6);
}

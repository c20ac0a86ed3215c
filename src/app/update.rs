use std::path::PathBuf;

use crate::app::Model;
use crate::app::model::{DisplayMode, ReloadReason, ToastLevel};
use crate::editor::Motion;
use crate::sync::Pane;
use crate::theme::selectable_themes;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Clock advanced to this many milliseconds since start
    Tick(u64),

    // Editor
    EditorInsertChar(char),
    EditorNewline,
    /// Insert pasted text at the cursor
    EditorPaste(String),
    EditorBackspace,
    EditorDelete,
    EditorMove(Motion),
    /// Place the cursor at (line, col), e.g. from a mouse click
    EditorMoveTo(usize, usize),

    // Scrolling
    /// Scroll a pane by a signed number of lines
    Scroll(Pane, isize),
    ScrollToTop(Pane),
    ScrollToBottom(Pane),
    /// Give keyboard focus to a pane
    Focus(Pane),
    /// Cycle focus between visible panes
    FocusNext,

    // Modes
    ToggleEditMode,
    ToggleReaderMode,

    // Themes
    OpenThemePicker,
    /// Move the theme picker highlight
    ThemePickerMove(isize),
    ConfirmThemePicker,
    CloseThemePicker,
    SelectTheme(String),

    // Document
    /// Replace document and theme with the defaults
    ResetToDefault,
    StartImport,
    /// Replace the import prompt text
    ImportInput(String),
    CancelImport,
    /// Read this file into the document
    ImportFile(PathBuf),
    /// An import read finished successfully
    FileLoaded(String),
    /// An import failed; the payload is shown to the user
    ImportFailed(String),
    /// An import was refused before reading
    ImportRejected(String),
    /// Write `export.html`
    ExportHtml,
    /// Export finished; the payload is the written path
    Exported(PathBuf),
    ExportFailed(String),

    // Help
    ToggleHelp,
    HideHelp,
    HelpScroll(isize),

    // Window
    Resize(u16, u16),
    Redraw,

    Quit,
}

/// Pure state transition.
///
/// Storage writes happen here synchronously; file reads and writes are
/// left to the event loop's side effects.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Tick(now_ms) => {
            model.tick(now_ms);
        }

        Message::EditorInsertChar(ch) => edit(&mut model, |m| m.editor.insert_char(ch)),
        Message::EditorNewline => edit(&mut model, |m| m.editor.newline()),
        Message::EditorPaste(text) => edit(&mut model, |m| m.editor.insert_str(&text)),
        Message::EditorBackspace => edit(&mut model, |m| {
            m.editor.backspace();
        }),
        Message::EditorDelete => edit(&mut model, |m| {
            m.editor.delete();
        }),
        Message::EditorMove(motion) => edit(&mut model, |m| m.editor.apply(motion)),
        Message::EditorMoveTo(line, col) => edit(&mut model, |m| m.editor.move_to(line, col)),

        Message::Scroll(pane, delta) => {
            if model.mode.shows(pane) {
                model.scroll_pane(pane, |vp| vp.scroll_by(delta));
            }
        }
        Message::ScrollToTop(pane) => {
            if model.mode.shows(pane) {
                model.scroll_pane(pane, |vp| vp.set_offset(0));
            }
        }
        Message::ScrollToBottom(pane) => {
            if model.mode.shows(pane) {
                model.scroll_pane(pane, |vp| vp.set_offset(vp.max_offset()));
            }
        }
        Message::Focus(pane) => {
            if model.mode.shows(pane) {
                model.focus = pane;
            }
        }
        Message::FocusNext => {
            let other = model.focus.other();
            if model.mode.shows(other) {
                model.focus = other;
            }
        }

        Message::ToggleEditMode => {
            let mode = if model.mode == DisplayMode::EditOnly {
                DisplayMode::Split
            } else {
                DisplayMode::EditOnly
            };
            model.set_mode(mode);
        }
        Message::ToggleReaderMode => {
            let mode = if model.mode == DisplayMode::ReaderOnly {
                DisplayMode::Split
            } else {
                DisplayMode::ReaderOnly
            };
            model.set_mode(mode);
        }

        Message::OpenThemePicker => {
            model.help_visible = false;
            model.import_prompt = None;
            model.theme_picker = Some(model.theme_index());
        }
        Message::ThemePickerMove(delta) => {
            if let Some(selected) = model.theme_picker {
                let last = selectable_themes().count().saturating_sub(1);
                model.theme_picker = Some(selected.saturating_add_signed(delta).min(last));
            }
        }
        Message::ConfirmThemePicker => {
            if let Some(name) = model
                .theme_picker
                .take()
                .and_then(|idx| selectable_themes().nth(idx))
            {
                model.select_theme(name);
            }
        }
        Message::CloseThemePicker => {
            model.theme_picker = None;
        }
        Message::SelectTheme(name) => {
            model.select_theme(&name);
        }

        Message::ResetToDefault => {
            model.reset_to_default();
            model.show_toast(ToastLevel::Info, "Reset to the default document");
        }
        Message::StartImport => {
            model.help_visible = false;
            model.theme_picker = None;
            model.import_prompt = Some(String::new());
        }
        Message::ImportInput(text) => {
            if model.import_prompt.is_some() {
                model.import_prompt = Some(text);
            }
        }
        Message::CancelImport | Message::ImportFile(_) => {
            model.import_prompt = None;
        }
        Message::FileLoaded(text) => {
            model.replace_document(text, ReloadReason::OpenFromDisk);
        }
        Message::ImportFailed(reason) => {
            model.show_toast(ToastLevel::Error, reason);
        }
        Message::ImportRejected(reason) => {
            model.show_toast(ToastLevel::Warning, reason);
        }
        Message::Exported(path) => {
            model.show_toast(ToastLevel::Info, format!("Exported {}", path.display()));
        }
        Message::ExportFailed(reason) => {
            model.show_toast(ToastLevel::Error, reason);
        }

        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::HelpScroll(delta) => {
            model.help_scroll_offset = model
                .help_scroll_offset
                .saturating_add_signed(delta)
                .min(crate::ui::help_max_scroll(&model));
        }

        Message::Resize(width, height) => {
            model.resize(width, height);
        }
        Message::Quit => {
            model.should_quit = true;
        }
        Message::ExportHtml | Message::Redraw => {}
    }
    model
}

/// Apply an editor change, then fold it into the document and keep the
/// cursor visible.
fn edit(model: &mut Model, change: impl FnOnce(&mut Model)) {
    if !model.mode.shows(Pane::Editor) {
        return;
    }
    model.focus = Pane::Editor;
    change(model);
    model.sync_from_editor();
    model.reveal_cursor();
}

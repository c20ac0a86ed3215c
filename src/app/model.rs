use std::path::PathBuf;

use crate::editor::EditorBuffer;
use crate::render::Preview;
use crate::sample::DEFAULT_TEXT;
use crate::storage::StateStore;
use crate::sync::{Pane, ScrollLink};
use crate::theme::{DEFAULT_THEME, ThemeRegistry, is_known_theme, selectable_themes};
use crate::ui::viewport::Viewport;

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at_ms: u64,
}

/// Which panes are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Editor and preview side by side.
    #[default]
    Split,
    /// Edit mode: the editor alone, centered.
    EditOnly,
    /// Reader mode: the preview alone, centered.
    ReaderOnly,
}

impl DisplayMode {
    pub const fn shows(self, pane: Pane) -> bool {
        match self {
            Self::Split => true,
            Self::EditOnly => matches!(pane, Pane::Editor),
            Self::ReaderOnly => matches!(pane, Pane::Preview),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::EditOnly => "edit",
            Self::ReaderOnly => "reader",
        }
    }
}

/// Why the editor buffer must be reloaded from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    OpenFromDisk,
    ResetToDefault,
}

/// The complete application state.
///
/// All state lives here: storage and the theme registry are fields, not
/// globals.
pub struct Model {
    /// Markdown source; the single document.
    pub document: String,
    pub editor: EditorBuffer,
    pub preview: Preview,
    pub mode: DisplayMode,
    pub focus: Pane,
    /// Selected theme name, [`DEFAULT_THEME`] or one of the theme list.
    pub theme: String,
    pub themes: ThemeRegistry,
    pub store: StateStore,
    /// Present only while both panes are on screen.
    pub scroll_link: Option<ScrollLink>,
    pub editor_viewport: Viewport,
    pub preview_viewport: Viewport,
    /// Milliseconds since the event loop started.
    pub clock_ms: u64,
    pub pending_reload: Option<ReloadReason>,
    /// Path being typed into the import prompt.
    pub import_prompt: Option<String>,
    /// Highlighted row of the theme picker.
    pub theme_picker: Option<usize>,
    pub help_visible: bool,
    pub help_scroll_offset: usize,
    pub export_dir: PathBuf,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    pub should_quit: bool,
    toast: Option<Toast>,
    terminal_size: (u16, u16),
    last_revision: u64,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("mode", &self.mode)
            .field("focus", &self.focus)
            .field("theme", &self.theme)
            .field("document_len", &self.document.len())
            .field("scroll_link", &self.scroll_link.is_some())
            .field("pending_reload", &self.pending_reload)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Restore the session from `store`, falling back to the default
    /// document and theme for anything absent or empty.
    pub fn new(store: StateStore, mut themes: ThemeRegistry, terminal_size: (u16, u16)) -> Self {
        let document = store
            .markdown_text()
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_TEXT.to_string());
        let theme = match store.theme_selected() {
            Some(name) if is_known_theme(&name) => name,
            Some(name) if !name.is_empty() => {
                tracing::warn!(theme = %name, "ignoring unknown stored theme");
                DEFAULT_THEME.to_string()
            }
            _ => DEFAULT_THEME.to_string(),
        };
        themes.load(&theme);

        let mut model = Self {
            editor: EditorBuffer::from_text(&document),
            preview: Preview::default(),
            document,
            mode: DisplayMode::Split,
            focus: Pane::Editor,
            theme,
            themes,
            store,
            scroll_link: None,
            editor_viewport: Viewport::default(),
            preview_viewport: Viewport::default(),
            clock_ms: 0,
            pending_reload: None,
            import_prompt: None,
            theme_picker: None,
            help_visible: false,
            help_scroll_offset: 0,
            export_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            toast: None,
            terminal_size,
            last_revision: 0,
        };
        model.reflow_layout();
        model
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.set_mode(mode);
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub const fn viewport(&self, pane: Pane) -> &Viewport {
        match pane {
            Pane::Editor => &self.editor_viewport,
            Pane::Preview => &self.preview_viewport,
        }
    }

    pub(super) const fn viewport_mut(&mut self, pane: Pane) -> &mut Viewport {
        match pane {
            Pane::Editor => &mut self.editor_viewport,
            Pane::Preview => &mut self.preview_viewport,
        }
    }

    pub(super) fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "display mode");
        self.mode = mode;
        if !mode.shows(self.focus) {
            self.focus = self.focus.other();
        }
        self.reflow_layout();
    }

    /// Size both panes for the current mode and terminal, re-render the
    /// preview at the new width, and create or drop the scroll link.
    pub(super) fn reflow_layout(&mut self) {
        let (width, height) = self.terminal_size;
        let areas = crate::ui::pane_areas(ratatui::layout::Rect::new(0, 0, width, height), self.mode);

        let editor = areas.editor.map(crate::ui::pane_inner).unwrap_or_default();
        self.editor_viewport.resize(editor.width, editor.height);
        self.editor_viewport.set_total_lines(self.editor.line_count());

        let preview = areas.preview.map(crate::ui::pane_inner).unwrap_or_default();
        let preview_width = crate::ui::preview_text_width(preview.width);
        if preview_width != self.preview.width() || self.preview.lines().is_empty() {
            self.preview = Preview::render(&self.document, preview_width);
        }
        self.preview_viewport.resize(preview.width, preview.height);
        self.preview_viewport.set_total_lines(self.preview.line_count());

        match (self.mode, self.scroll_link.is_some()) {
            (DisplayMode::Split, false) => {
                tracing::debug!("scroll link attached");
                self.scroll_link = Some(ScrollLink::default());
            }
            (DisplayMode::EditOnly | DisplayMode::ReaderOnly, true) => {
                tracing::debug!("scroll link detached");
                self.scroll_link = None;
            }
            _ => {}
        }
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.reflow_layout();
    }

    /// Deliver a scroll event from `source` and any echo it causes.
    ///
    /// Returns the number of scroll events delivered to the link.
    pub(super) fn dispatch_scroll(&mut self, source: Pane) -> usize {
        let mut delivered = 0;
        let mut next = Some(source);
        while let Some(pane) = next.take() {
            let Some(link) = self.scroll_link.as_mut() else {
                break;
            };
            delivered += 1;
            let offset = match pane {
                Pane::Editor => self.editor_viewport.offset(),
                Pane::Preview => self.preview_viewport.offset(),
            };
            if let Some(drive) = link.on_scroll(pane, offset, self.clock_ms)
                && self.viewport_mut(drive.target).set_offset(drive.offset)
            {
                next = Some(drive.target);
            }
        }
        delivered
    }

    /// Move a pane and, if it actually moved, report the scroll.
    pub(super) fn scroll_pane(&mut self, pane: Pane, apply: impl FnOnce(&mut Viewport) -> bool) {
        if apply(self.viewport_mut(pane)) {
            self.dispatch_scroll(pane);
        }
    }

    /// Advance the clock. Returns `true` if anything visible changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.clock_ms = self.clock_ms.max(now_ms);
        let mut changed = false;
        if let Some(link) = self.scroll_link.as_mut() {
            link.poll(self.clock_ms);
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at_ms <= self.clock_ms)
        {
            self.toast = None;
            changed = true;
        }
        changed
    }

    /// Earliest time the model wants a [`Model::tick`].
    pub fn next_deadline(&self) -> Option<u64> {
        let link = self.scroll_link.as_ref().and_then(ScrollLink::next_deadline);
        let toast = self.toast.as_ref().map(|toast| toast.expires_at_ms);
        link.into_iter().chain(toast).min()
    }

    /// Replace the whole document, persist it, and schedule the editor reload.
    pub(super) fn replace_document(&mut self, text: String, reason: ReloadReason) {
        self.store.set_markdown_text(&text);
        self.document = text;
        self.pending_reload = Some(reason);
        self.rerender_preview();
    }

    /// Pull editor edits into the document. No-op if the buffer is unchanged.
    pub(super) fn sync_from_editor(&mut self) {
        let revision = self.editor.revision();
        if revision == self.last_revision {
            return;
        }
        self.last_revision = revision;
        self.document = self.editor.text();
        self.store.set_markdown_text(&self.document);
        self.editor_viewport.set_total_lines(self.editor.line_count());
        self.rerender_preview();
    }

    /// Keep the cursor line on screen, reporting any scroll it causes.
    pub(super) fn reveal_cursor(&mut self) {
        let line = self.editor.cursor().line;
        self.scroll_pane(Pane::Editor, |vp| vp.reveal(line));
    }

    fn rerender_preview(&mut self) {
        self.preview = Preview::render(&self.document, self.preview.width());
        let total = self.preview.line_count();
        self.scroll_pane(Pane::Preview, |vp| vp.set_total_lines(total));
    }

    /// Load the document into the editor if a wholesale replacement is
    /// pending. Returns the reason, clearing it, so each replacement is
    /// applied exactly once.
    pub fn finish_pending_reload(&mut self) -> Option<ReloadReason> {
        let reason = self.pending_reload.take()?;
        self.editor.replace_text(&self.document);
        self.last_revision = self.editor.revision();
        self.editor_viewport.set_total_lines(self.editor.line_count());
        self.scroll_pane(Pane::Editor, |vp| vp.set_offset(0));
        tracing::debug!(?reason, "editor reloaded");
        Some(reason)
    }

    pub(super) fn select_theme(&mut self, name: &str) {
        if !is_known_theme(name) {
            tracing::warn!(theme = name, "unknown theme");
            return;
        }
        self.store.set_theme_selected(name);
        self.themes.load(name);
        name.clone_into(&mut self.theme);
    }

    pub(super) fn reset_to_default(&mut self) {
        self.store.set_theme_selected(DEFAULT_THEME);
        DEFAULT_THEME.clone_into(&mut self.theme);
        self.replace_document(DEFAULT_TEXT.to_string(), ReloadReason::ResetToDefault);
    }

    /// Row of the current theme in the picker list.
    pub fn theme_index(&self) -> usize {
        selectable_themes()
            .position(|name| name == self.theme)
            .unwrap_or(0)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at_ms: self.clock_ms.saturating_add(TOAST_DURATION_MS),
        });
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub const fn overlay_active(&self) -> bool {
        self.help_visible || self.import_prompt.is_some() || self.theme_picker.is_some()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(StateStore::disabled(), ThemeRegistry::default(), (80, 24))
    }
}

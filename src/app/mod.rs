//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{DisplayMode, Model, ReloadReason, TOAST_DURATION_MS, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::import::read_document;
use crate::storage::StateStore;
use crate::theme::ThemeRegistry;

/// Builder for a session: where state lives and how it starts.
pub struct App {
    store: StateStore,
    themes: ThemeRegistry,
    mode: DisplayMode,
    open_path: Option<PathBuf>,
    export_dir: PathBuf,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            themes: ThemeRegistry::default(),
            mode: DisplayMode::Split,
            open_path: None,
            export_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
        }
    }

    #[must_use]
    pub fn with_themes(mut self, themes: ThemeRegistry) -> Self {
        self.themes = themes;
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Import this file on startup, as if opened from the import prompt.
    #[must_use]
    pub fn with_open_path(mut self, path: Option<PathBuf>) -> Self {
        self.open_path = path;
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Restore the session and apply the startup import, if any. A failed
    /// import shows up as a toast, like one from the prompt.
    pub fn build_model(self, terminal_size: (u16, u16)) -> Model {
        let Self {
            store,
            themes,
            mode,
            open_path,
            export_dir,
            config_global_path,
            config_local_path,
        } = self;
        let mut model = Model::new(store, themes, terminal_size)
            .with_mode(mode)
            .with_export_dir(export_dir);
        model.config_global_path = config_global_path;
        model.config_local_path = config_local_path;
        if let Some(path) = open_path {
            Self::dispatch(&mut model, Message::ImportFile(path));
        }
        model
    }

    /// Render the session's document to `export.html` without a terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the startup import cannot be read or the export
    /// cannot be written.
    pub fn export(self) -> Result<PathBuf> {
        let open_path = self.open_path.clone();
        let mut model = Self {
            open_path: None,
            ..self
        }
        .build_model((80, 24));
        if let Some(path) = open_path {
            let text = read_document(&path)
                .with_context(|| format!("Failed to import {}", path.display()))?;
            Self::dispatch(&mut model, Message::FileLoaded(text));
        }
        crate::render::export_html(&model.document, &model.export_dir)
    }
}

// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. storage::StorageError)
    clippy::module_name_repetitions
)]

//! # Splitmark
//!
//! A terminal markdown editor with a synchronized live preview.
//!
//! Splitmark puts a plain-text editor beside a rendered preview:
//! - Panes that scroll together
//! - Edit-only and reader-only modes
//! - A session (document and theme) that survives restarts
//! - Import of `.md` / `.txt` files and export to `export.html`
//!
//! ## Architecture
//!
//! Splitmark uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`storage`]: Persisted key-value state
//! - [`sync`]: Editor/preview scroll synchronization
//! - [`editor`]: Text buffer and cursor
//! - [`render`]: Markdown to preview lines and HTML
//! - [`theme`]: Theme names and palettes
//! - [`import`]: Reading documents from disk
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod editor;
pub mod import;
pub mod render;
pub mod sample;
pub mod storage;
pub mod sync;
pub mod theme;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, DisplayMode, Message, Model};
    pub use crate::storage::StateStore;
    pub use crate::sync::{Pane, ScrollLink};
    pub use crate::ui::viewport::Viewport;
}

//! Terminal UI components.
//!
//! - [`viewport`]: Scroll position and visible range of a pane
//! - [`style`]: Preview colors and editor palette styling

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{help_lines, help_max_scroll, theme_picker_rect};
pub use render::{
    PaneAreas, column_at_cell, editor_shift, editor_text_width, gutter_width, pane_areas,
    pane_inner, preview_text_width, render,
};

/// Blank columns on each side of the preview text.
pub const PREVIEW_PADDING: u16 = 1;
/// Width of a single centered pane, as a share of the terminal.
pub const CENTERED_WIDTH_PERCENT: u16 = 70;
/// Centered panes never shrink below this many columns (terminal permitting).
pub const CENTERED_MIN_WIDTH: u16 = 60;

#[cfg(test)]
mod tests;

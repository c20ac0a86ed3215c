//! Editor/preview scroll synchronization.
//!
//! - [`ScrollLink`]: mirrors one pane's offset onto the other without
//!   feedback loops
//! - [`CancelableTimer`]: the debounce primitive behind the suppression window

mod scroll;
mod timer;

pub use scroll::{Pane, SCROLL_SYNC_WINDOW_MS, ScrollDrive, ScrollLink};
pub use timer::CancelableTimer;

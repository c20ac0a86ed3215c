//! Persisted editor state.
//!
//! A small key-value layer that keeps the document text and the selected
//! theme across sessions:
//! - [`StorageBackend`]: the raw key-value mechanism (file or memory)
//! - [`StateStore`]: the two-field wrapper the app talks to
//! - [`probe`]: availability check run before a backend is engaged
//!
//! When no backend is usable the store runs disengaged: reads return `None`
//! and writes are dropped, so the app keeps working in memory.

mod backend;
mod store;

pub use backend::{DEFAULT_QUOTA_BYTES, FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::{Field, PROBE_KEY, StateStore, probe};

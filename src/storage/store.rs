use super::backend::{StorageBackend, StorageError};

/// Throwaway key used by [`probe`].
pub const PROBE_KEY: &str = "__storage_test__";

/// The two persisted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The markdown document.
    MarkdownText,
    /// The selected editor theme.
    ThemeSelected,
}

impl Field {
    pub const fn key(self) -> &'static str {
        match self {
            Self::MarkdownText => "markdown-text",
            Self::ThemeSelected => "theme-selected",
        }
    }
}

/// Check that `backend` accepts a write/remove round trip.
///
/// A quota failure on a backend that already holds data still counts as
/// available: the store is full, not broken.
pub fn probe(backend: &mut dyn StorageBackend) -> bool {
    let result = backend
        .set_item(PROBE_KEY, PROBE_KEY)
        .and_then(|()| backend.remove_item(PROBE_KEY));
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "storage probe failed");
            quota_on_populated_store(&err, backend.len())
        }
    }
}

const fn quota_on_populated_store(err: &StorageError, len: usize) -> bool {
    err.is_quota_exceeded() && len != 0
}

/// Durable storage for the document text and theme selection.
///
/// Owned by the app model; there is no process-wide instance.
pub struct StateStore {
    backend: Option<Box<dyn StorageBackend>>,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("engaged", &self.is_engaged())
            .finish()
    }
}

impl StateStore {
    /// Engage `backend` if it passes [`probe`], otherwise run disengaged.
    pub fn new(mut backend: Box<dyn StorageBackend>) -> Self {
        if probe(backend.as_mut()) {
            Self {
                backend: Some(backend),
            }
        } else {
            tracing::warn!("persistent storage unavailable; changes will not survive restart");
            Self::disabled()
        }
    }

    /// A store with no backend: every read is `None`, every write a no-op.
    pub const fn disabled() -> Self {
        Self { backend: None }
    }

    pub const fn is_engaged(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self, field: Field) -> Option<String> {
        self.backend.as_ref()?.get_item(field.key())
    }

    /// Write through to the backend. Failures are logged, never returned.
    pub fn set(&mut self, field: Field, value: &str) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(err) = backend.set_item(field.key(), value) {
            tracing::warn!(key = field.key(), error = %err, "failed to persist field");
        }
    }

    pub fn markdown_text(&self) -> Option<String> {
        self.get(Field::MarkdownText)
    }

    pub fn set_markdown_text(&mut self, text: &str) {
        self.set(Field::MarkdownText, text);
    }

    pub fn theme_selected(&self) -> Option<String> {
        self.get(Field::ThemeSelected)
    }

    pub fn set_theme_selected(&mut self, name: &str) {
        self.set(Field::ThemeSelected, name);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use proptest::prelude::*;

    /// Fails every write with an I/O error regardless of contents.
    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "broken".into(),
                source: std::io::Error::other("read-only medium"),
            })
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn len(&self) -> usize {
            3
        }
    }

    #[test]
    fn test_probe_accepts_working_backend_and_cleans_up() {
        let mut backend = MemoryStorage::new();
        assert!(probe(&mut backend));
        assert_eq!(backend.get_item(PROBE_KEY), None);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_probe_rejects_quota_on_empty_backend() {
        let mut backend = MemoryStorage::with_quota(4);
        assert!(!probe(&mut backend));
    }

    #[test]
    fn test_probe_accepts_quota_on_populated_backend() {
        let mut backend = MemoryStorage::with_quota(4).seed("k", "v");
        assert!(probe(&mut backend));
    }

    #[test]
    fn test_probe_rejects_non_quota_failure_even_when_populated() {
        let mut backend = BrokenStorage;
        assert!(!probe(&mut backend));
    }

    #[test]
    fn test_probe_rejects_disabled_backend() {
        let mut backend = MemoryStorage::disabled();
        assert!(!probe(&mut backend));
    }

    #[test]
    fn test_unset_fields_are_absent() {
        let store = StateStore::new(Box::new(MemoryStorage::new()));
        assert!(store.is_engaged());
        assert_eq!(store.markdown_text(), None);
        assert_eq!(store.theme_selected(), None);
    }

    #[test]
    fn test_fields_use_fixed_keys() {
        let backend = MemoryStorage::new()
            .seed("markdown-text", "# saved")
            .seed("theme-selected", "monokai");
        let store = StateStore::new(Box::new(backend));
        assert_eq!(store.markdown_text(), Some("# saved".to_string()));
        assert_eq!(store.theme_selected(), Some("monokai".to_string()));
    }

    #[test]
    fn test_disengaged_store_is_silent_noop() {
        let mut store = StateStore::new(Box::new(MemoryStorage::disabled()));
        assert!(!store.is_engaged());
        store.set_markdown_text("lost");
        store.set_theme_selected("dracula");
        assert_eq!(store.markdown_text(), None);
        assert_eq!(store.theme_selected(), None);
    }

    #[test]
    fn test_write_failure_after_engage_keeps_previous_value() {
        // Room for the probe key but not much else.
        let mut store = StateStore::new(Box::new(MemoryStorage::with_quota(40)));
        store.set_theme_selected("dracula");
        store.set_markdown_text(&"x".repeat(100));
        assert_eq!(store.theme_selected(), Some("dracula".to_string()));
        assert_eq!(store.markdown_text(), None);
    }

    proptest! {
        #[test]
        fn prop_engaged_store_round_trips_any_text(text in any::<String>()) {
            let mut store = StateStore::new(Box::new(MemoryStorage::new()));
            store.set_markdown_text(&text);
            prop_assert_eq!(store.markdown_text(), Some(text));
        }

        #[test]
        fn prop_disengaged_store_always_absent(text in any::<String>()) {
            let mut store = StateStore::disabled();
            store.set(Field::MarkdownText, &text);
            store.set(Field::ThemeSelected, &text);
            prop_assert_eq!(store.get(Field::MarkdownText), None);
            prop_assert_eq!(store.get(Field::ThemeSelected), None);
        }
    }
}

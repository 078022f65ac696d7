//! Persisted boolean preferences.
//!
//! Values are stored as JSON booleans (`"true"` / `"false"`). Reading is
//! forgiving: an absent, malformed or unreadable value yields `true`.
//! Writing is best-effort: failures are logged and otherwise ignored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

/// Key holding the motion preference.
pub const MOTION_KEY: &str = "velvet.motion";

/// Durable string key-value storage.
pub trait PreferenceBackend {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryBackend {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with one raw value.
    #[must_use]
    pub fn with_value(key: &str, raw: &str) -> Self {
        let mut backend = Self::default();
        backend.values.insert(key.to_string(), raw.to_string());
        backend
    }

    /// Storage that fails every read and write.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Raw value under `key`, bypassing the failure flag.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("memory backend disabled".into()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Write("memory backend disabled".into()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<B: PreferenceBackend> PreferenceBackend for Rc<RefCell<B>> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.try_borrow()
            .map_err(|_| StorageError::Unavailable("backend busy".into()))?
            .read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.try_borrow_mut()
            .map_err(|_| StorageError::Write("backend busy".into()))?
            .write(key, value)
    }
}

/// Boolean accessor over a [`PreferenceBackend`].
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
}

impl PreferenceStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: Box<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    /// Read a boolean, defaulting to `true`.
    #[must_use]
    pub fn get(&self, key: &str) -> bool {
        match self.backend.read(key) {
            Ok(Some(raw)) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::debug!("Malformed preference {key}={raw:?}, using default");
                true
            }),
            Ok(None) => true,
            Err(err) => {
                tracing::warn!("Preference {key} unreadable: {err}");
                true
            }
        }
    }

    /// Write a boolean, best effort.
    pub fn set(&mut self, key: &str, value: bool) {
        let raw = if value { "true" } else { "false" };
        if let Err(err) = self.backend.write(key, raw) {
            tracing::warn!("Preference {key} not persisted: {err}");
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    serde_json::from_str::<bool>(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_defaults_to_true() {
        let store = PreferenceStore::default();
        assert!(store.get(MOTION_KEY));
    }

    #[test]
    fn malformed_defaults_to_true() {
        for raw in ["", "yes", "0", "{}", "\"false\""] {
            let store = PreferenceStore::new(Box::new(MemoryBackend::with_value(MOTION_KEY, raw)));
            assert!(store.get(MOTION_KEY), "raw {raw:?}");
        }
    }

    #[test]
    fn stored_false_is_read_back() {
        let store = PreferenceStore::new(Box::new(MemoryBackend::with_value(MOTION_KEY, "false")));
        assert!(!store.get(MOTION_KEY));
        let store = PreferenceStore::new(Box::new(MemoryBackend::with_value(MOTION_KEY, " true ")));
        assert!(store.get(MOTION_KEY));
    }

    #[test]
    fn set_writes_json_text() {
        let mut store = PreferenceStore::default();
        store.set(MOTION_KEY, true);
        store.set(MOTION_KEY, false);
        assert!(!store.get(MOTION_KEY));
    }

    #[test]
    fn shared_backend_survives_reload() {
        let backend = Rc::new(RefCell::new(MemoryBackend::new()));
        let mut first = PreferenceStore::new(Box::new(Rc::clone(&backend)));
        first.set(MOTION_KEY, true);
        first.set(MOTION_KEY, false);
        drop(first);

        assert_eq!(backend.borrow().raw(MOTION_KEY), Some("false"));
        let reloaded = PreferenceStore::new(Box::new(backend));
        assert!(!reloaded.get(MOTION_KEY));
    }

    #[test]
    fn unavailable_storage_is_tolerated() {
        let mut store = PreferenceStore::new(Box::new(MemoryBackend::unavailable()));
        store.set(MOTION_KEY, false);
        assert!(store.get(MOTION_KEY));
    }
}

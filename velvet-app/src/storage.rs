//! `localStorage` preference backend.

use velvet_core::{PreferenceBackend, StorageError};
use web_sys::{Storage, Window};

use crate::js;

/// Reads and writes `window.localStorage`.
///
/// Storage is looked up on every access: it can be disabled (private mode,
/// blocked cookies) and the lookup itself can throw.
#[derive(Debug, Clone)]
pub struct LocalStorageBackend {
    window: Window,
}

impl LocalStorageBackend {
    /// Backend over `window`'s storage.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Result<Storage, StorageError> {
        self.window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(js::describe(&err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

impl PreferenceBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js::describe(&err)))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write(js::describe(&err)))
    }
}

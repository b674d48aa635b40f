//! # Browser `localStorage` session storage
//!
//! [`LocalStorage`] is the [`SessionStorage`] used on the **web platform**. The
//! serialized session lives under a single key of `window.localStorage`, which
//! is synchronous, so setters can persist without suspending.
//!
//! A missing window or a storage quota error is reported as
//! [`StorageError::Unavailable`]; the session store logs it and keeps going
//! with the in-memory state.

use web_sys::Storage;

use crate::storage::{SessionStorage, StorageError};

/// `window.localStorage`-backed SessionStorage.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl SessionStorage for LocalStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&self.key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

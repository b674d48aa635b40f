use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::storage::{SessionStorage, StorageError};

/// In-memory SessionStorage for testing and as a fallback when no durable
/// backend is available. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    key: String,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Arc::default(),
        }
    }

    /// Another slot over the same entries, e.g. to inspect what a store wrote.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Arc::clone(&self.entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(&self.key).cloned())
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(self.key.clone(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.remove(&self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new("userStore");
        let other = storage.clone();

        storage.save("{}").unwrap();
        assert_eq!(other.load().unwrap().as_deref(), Some("{}"));

        other.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_keys_are_isolated() {
        let storage = MemoryStorage::new("userStore");
        let settings = storage.with_key("settings");

        storage.save("session").unwrap();
        assert!(settings.load().unwrap().is_none());

        // Clearing a missing entry is fine
        settings.clear().unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("session"));
    }
}

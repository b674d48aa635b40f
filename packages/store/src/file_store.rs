//! # Filesystem-backed session storage
//!
//! [`FileStorage`] is a [`SessionStorage`] implementation that persists the
//! serialized session to the local filesystem. It is used when the client runs
//! natively (tests, `dx serve` without a browser) so the session survives
//! restarts the same way `localStorage` does in the browser.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>.json      # serialized Session
//! ```
//!
//! ## Platform data directories
//!
//! [`FileStorage::in_data_dir`] uses [`dirs::data_dir()`] for the base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/attendance/` |
//! | Linux | `~/.local/share/attendance/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\attendance\` |

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage::{SessionStorage, StorageError};

/// Filesystem-backed SessionStorage for native targets.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
    key: String,
}

impl FileStorage {
    pub fn new(base: PathBuf, key: impl Into<String>) -> Self {
        Self {
            base,
            key: key.into(),
        }
    }

    /// Storage under the platform data directory, `./attendance` if none.
    pub fn in_data_dir(key: impl Into<String>) -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("attendance");
        Self::new(base, key)
    }

    fn entry_path(&self) -> PathBuf {
        self.base.join(format!("{}.json", self.key))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.entry_path()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.entry_path(), value)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(self.entry_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Session, SessionStore};

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "attendance_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = temp_base("reopen");

        let mut store = SessionStore::new(FileStorage::new(dir.clone(), "userStore"));
        store.hydrate();
        store.set_token(Some("tok1".to_string()));

        // Re-open from the same directory
        let mut reopened = SessionStore::new(FileStorage::new(dir.clone(), "userStore"));
        reopened.hydrate();
        assert_eq!(reopened.session().token.as_deref(), Some("tok1"));

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_clear_missing_file_is_ok() {
        let dir = temp_base("clear");
        let storage = FileStorage::new(dir.clone(), "userStore");

        assert!(storage.load().unwrap().is_none());
        storage.clear().unwrap();

        storage
            .save(&serde_json::to_string(&Session::default()).unwrap())
            .unwrap();
        assert!(storage.load().unwrap().is_some());
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}

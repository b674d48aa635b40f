//! Durable key-value backend for the persisted session.

use thiserror::Error;

/// Errors from a [`SessionStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A single durable slot holding the serialized session.
///
/// Each backend is bound to one key at construction, so the methods only move
/// the serialized string in and out.
pub trait SessionStorage {
    /// Read the stored value, `None` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the stored value.
    fn save(&self, value: &str) -> Result<(), StorageError>;

    /// Remove the stored value. Removing a missing entry is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for Box<S> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        (**self).save(value)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

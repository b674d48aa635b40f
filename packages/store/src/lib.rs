pub mod config;
pub mod models;
pub mod session;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorage;

pub use config::ServiceConfig;
pub use models::{Profile, Session, User, UserPatch};
pub use session::{HydrationSubscription, SessionStore};
pub use storage::{SessionStorage, StorageError};

/// Platform-appropriate durable storage for the session.
///
/// - **Web** (WASM + `web` feature): `window.localStorage` via [`LocalStorage`]
/// - **Native**: a JSON file in the platform data directory via [`FileStorage`]
/// - **WASM without `web`**: in-memory only
pub fn default_storage(key: &str) -> Box<dyn SessionStorage> {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        Box::new(LocalStorage::new(key))
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        Box::new(MemoryStorage::new(key))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileStorage::in_data_dir(key))
    }
}

//! # Client configuration
//!
//! Where the attendance service lives and where the session is persisted.
//! In the browser there is no config file to read, so the service URL is baked
//! in at build time from `ATTENDANCE_SERVICE_URL` (see
//! [`ServiceConfig::from_env`]). Native builds and tests may parse TOML.
//!
//! ## Structure
//!
//! ```toml
//! [service]
//! url = "http://localhost:5001"   # base URL, no trailing slash needed
//!
//! [storage]
//! key = "userStore"               # durable storage key for the session
//! ```
//!
//! All structs derive `Default` so a missing or empty file is equivalent to the
//! default configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_SERVICE_URL: &str = "http://localhost:5001";
const DEFAULT_STORAGE_KEY: &str = "userStore";

/// Top-level client configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub storage: StorageSection,
}

/// Attendance service endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    #[serde(default = "default_service_url")]
    pub url: String,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            url: default_service_url(),
        }
    }
}

/// Session persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

impl ServiceConfig {
    /// Create a config pointing at the given service URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            service: ServiceSection { url: url.into() },
            storage: StorageSection::default(),
        }
    }

    /// Builder method to set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage.key = key.into();
        self
    }

    /// The build-time `ATTENDANCE_SERVICE_URL`, or the default URL.
    pub fn from_env() -> Self {
        match option_env!("ATTENDANCE_SERVICE_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.service.url.trim_end_matches('/')
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ServiceConfig::from_toml("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.base_url(), "http://localhost:5001");
        assert_eq!(config.storage.key, "userStore");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = ServiceConfig::from_toml(
            r#"
            [service]
            url = "https://absen.example.id/api/"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "https://absen.example.id/api");
        assert_eq!(config.storage.key, "userStore");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ServiceConfig::new("http://10.0.0.2:5001").with_storage_key("session");
        let parsed = ServiceConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}

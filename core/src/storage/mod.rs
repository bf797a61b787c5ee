//! Storage port — the narrow key-value interface the state store persists
//! through.
//!
//! Values are opaque UTF-8 strings; the store decides what is JSON and what
//! is raw text. Two adapters are provided: [`MemoryStorage`] (in-process,
//! optionally quota-limited, used by tests) and [`FileStorage`] (one file per
//! key under a data directory).

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

pub const MENU_DATA_KEY: &str = "menu_data";
pub const CLEANING_DATA_KEY: &str = "cleaning_data";
pub const SERVICE_DATA_KEY: &str = "service_data";
pub const SETTINGS_KEY: &str = "settings";
pub const UPDATE_HISTORY_KEY: &str = "update_history";
pub const CALENDAR_EMBED_KEY: &str = "calendar_embed";
pub const LAST_RESET_KEY: &str = "last_checklist_reset";

/// Check that a key only uses characters safe for every adapter.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StorageError {
    /// Underlying filesystem failure.
    Io(std::io::Error),
    /// Key contains characters the adapter cannot address.
    InvalidKey(String),
    /// The write would exceed the configured capacity.
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {}", e),
            StorageError::InvalidKey(k) => write!(f, "invalid storage key: '{}'", k),
            StorageError::QuotaExceeded { key, needed, limit } => write!(
                f,
                "storage quota exceeded writing '{}': {} bytes needed, limit {}",
                key, needed, limit
            ),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// KeyValueStorage
// ---------------------------------------------------------------------------

/// Durable key-value storage. Reads and writes are synchronous.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keys_are_valid() {
        for key in [
            MENU_DATA_KEY,
            CLEANING_DATA_KEY,
            SERVICE_DATA_KEY,
            SETTINGS_KEY,
            UPDATE_HISTORY_KEY,
            CALENDAR_EMBED_KEY,
            LAST_RESET_KEY,
        ] {
            assert!(validate_key(key).is_ok(), "{}", key);
        }
    }

    #[test]
    fn rejects_path_like_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key(".hidden").is_err());
    }

    #[test]
    fn memory_implements_storage() {
        let storage = MemoryStorage::new();
        let _: &dyn KeyValueStorage = &storage;
    }
}

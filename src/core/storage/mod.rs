//! Key/value storage host
//!
//! Mirrors the browser storage model: an origin-wide [`StorageArea`] holds the data and
//! every consumer ("tab") opens its own [`StorageHandle`]. Writes through one handle are
//! broadcast as [`StorageEvent`]s to listeners registered on the other handles.

pub mod area;
pub mod file;
pub mod memory;

pub use area::{ListenerId, StorageArea, StorageHandle};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::path::PathBuf;
use thiserror::Error;

/// Failure while writing to a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing file could not be written
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Value could not be encoded
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    /// Backing file exists but does not parse; it is left as found
    #[error("storage file {} is unreadable: {reason}", path.display())]
    Unreadable {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },
    /// Internal lock was poisoned by a panicking writer
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key/value storage backend
///
/// Reads never fail: an unreadable or missing value is reported as absent.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key succeeds
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// All stored keys, sorted
    fn keys(&self) -> Vec<String>;
}

/// Change notification delivered to other handles of the same area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that changed
    pub key: String,
    /// Value before the write
    pub old_value: Option<String>,
    /// Value after the write; `None` when removed
    pub new_value: Option<String>,
}

//! Key-value storage abstractions

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Stored data under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode expenses: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("No expense at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A durable text store, the equivalent of browser local storage.
///
/// Writes replace the whole value under a key in one call.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

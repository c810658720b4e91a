use crate::core::storage::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Volatile store backed by a HashMap. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let value = map.get(key).cloned();
        debug!(key, hit = value.is_some(), "Memory GET");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        map.insert(key.to_string(), value.to_string());
        debug!(key, "Memory SET");
        Ok(())
    }
}

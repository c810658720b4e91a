use crate::core::storage::{KeyValueStore, StorageError};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "local_storage";

fn backend_error(e: fjall::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// Durable store on top of a fjall keyspace.
///
/// Every `set` is synced to disk before returning.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path).map_err(|e| {
            StorageError::Backend(format!("Failed to create {}: {e}", path.display()))
        })?;

        let keyspace = Config::new(path).open().map_err(backend_error)?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .map_err(backend_error)?;
        debug!(path = %path.display(), "Opened disk store");

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(bytes) = self.partition.get(key.as_bytes()).map_err(backend_error)? else {
            debug!(key, "Disk MISS");
            return Ok(None);
        };
        debug!(key, "Disk HIT");
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| StorageError::Backend(format!("Value under '{key}' is not UTF-8: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.partition.insert(key.as_bytes(), value.as_bytes()).map_err(backend_error)?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .map_err(backend_error)?;
        debug!(key, "Disk SET");
        Ok(())
    }
}

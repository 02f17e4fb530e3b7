use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{BlobStore, LocalStorageError};

/// Blob store kept in memory. Clones share the same contents, so a test can
/// hand one clone to a store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<usize>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.read().expect("blob store lock poisoned")
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, LocalStorageError> {
        Ok(self
            .blobs
            .read()
            .expect("blob store lock poisoned")
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        self.blobs
            .write()
            .expect("blob store lock poisoned")
            .insert(key.to_string(), value.to_string());
        *self.writes.write().expect("blob store lock poisoned") += 1;
        Ok(())
    }
}

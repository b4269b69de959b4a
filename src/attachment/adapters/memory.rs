//! In-memory blob store.

use crate::attachment::{BlobStore, BlobStoreError};
use crate::ticket::domain::AttachmentKey;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Blobs = HashMap<AttachmentKey, Vec<u8>>;

/// Thread-safe blob store held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<Blobs>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the lock is poisoned.
    pub fn blob_count(&self) -> Result<usize, BlobStoreError> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Blobs>, BlobStoreError> {
        self.blobs
            .read()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Blobs>, BlobStoreError> {
        self.blobs
            .write()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &AttachmentKey, content: Vec<u8>) -> Result<(), BlobStoreError> {
        match self.write()?.entry(key.clone()) {
            Entry::Occupied(_) => Err(BlobStoreError::AlreadyExists(key.clone())),
            Entry::Vacant(slot) => {
                slot.insert(content);
                Ok(())
            }
        }
    }

    async fn get(&self, key: &AttachmentKey) -> Result<Vec<u8>, BlobStoreError> {
        self.read()?
            .get(key)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(key.clone()))
    }

    async fn delete(&self, key: &AttachmentKey) -> Result<(), BlobStoreError> {
        self.write()?
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::NotFound(key.clone()))
    }
}

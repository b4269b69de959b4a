//! Blob store port.

use crate::ticket::domain::AttachmentKey;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by blob stores.
#[derive(Debug, Clone, Error)]
pub enum BlobStoreError {
    /// A blob already exists under the key.
    #[error("blob already exists: {0}")]
    AlreadyExists(AttachmentKey),

    /// No blob exists under the key.
    #[error("blob not found: {0}")]
    NotFound(AttachmentKey),

    /// The store failed.
    #[error("blob store failure: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl BlobStoreError {
    /// Wraps a storage failure.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Binary object storage keyed by attachment key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `content` under a new key.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::AlreadyExists`] when the key is taken.
    async fn put(&self, key: &AttachmentKey, content: Vec<u8>) -> Result<(), BlobStoreError>;

    /// Reads the blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::NotFound`] when the key is unknown.
    async fn get(&self, key: &AttachmentKey) -> Result<Vec<u8>, BlobStoreError>;

    /// Deletes the blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::NotFound`] when the key is unknown.
    async fn delete(&self, key: &AttachmentKey) -> Result<(), BlobStoreError>;
}

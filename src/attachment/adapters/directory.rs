//! Blob store writing one file per key inside a directory.

use crate::attachment::{BlobStore, BlobStoreError};
use crate::ticket::domain::AttachmentKey;
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::{ErrorKind, Write};
use std::sync::Arc;

/// Blob store rooted at a directory.
///
/// Access goes through a capability handle, so keys can never escape the
/// root. Keys are already restricted to a safe character set with no
/// leading dot.
#[derive(Debug, Clone)]
pub struct DirectoryBlobStore {
    root: Arc<Dir>,
}

impl DirectoryBlobStore {
    /// Opens (creating when missing) the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(path: &Utf8Path) -> Result<Self, BlobStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(BlobStoreError::io)?;
        Dir::open_ambient_dir(path, ambient_authority())
            .map(Self::from_dir)
            .map_err(BlobStoreError::io)
    }

    /// Wraps an already opened directory.
    #[must_use]
    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T, BlobStoreError>
    where
        F: FnOnce(&Dir) -> Result<T, BlobStoreError> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || f(&root))
            .await
            .map_err(BlobStoreError::io)?
    }
}

#[async_trait]
impl BlobStore for DirectoryBlobStore {
    async fn put(&self, key: &AttachmentKey, content: Vec<u8>) -> Result<(), BlobStoreError> {
        let owned = key.clone();
        self.run_blocking(move |root| {
            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            let mut file = root.open_with(owned.as_str(), &options).map_err(|err| {
                if err.kind() == ErrorKind::AlreadyExists {
                    BlobStoreError::AlreadyExists(owned.clone())
                } else {
                    BlobStoreError::io(err)
                }
            })?;
            file.write_all(&content).map_err(BlobStoreError::io)?;
            file.sync_all().map_err(BlobStoreError::io)
        })
        .await
    }

    async fn get(&self, key: &AttachmentKey) -> Result<Vec<u8>, BlobStoreError> {
        let owned = key.clone();
        self.run_blocking(move |root| {
            root.read(owned.as_str()).map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    BlobStoreError::NotFound(owned.clone())
                } else {
                    BlobStoreError::io(err)
                }
            })
        })
        .await
    }

    async fn delete(&self, key: &AttachmentKey) -> Result<(), BlobStoreError> {
        let owned = key.clone();
        self.run_blocking(move |root| {
            root.remove_file(owned.as_str()).map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    BlobStoreError::NotFound(owned.clone())
                } else {
                    BlobStoreError::io(err)
                }
            })
        })
        .await
    }
}

//! Attachment upload, download, and removal.

use super::{BlobStore, BlobStoreError};
use crate::audit::{AuditAction, AuditEntry, AuditSink, record_best_effort};
use crate::error::ErrorKind;
use crate::notify::{TicketEvent, TicketNotifier};
use crate::ticket::{
    domain::{AttachmentKey, FileAttachment, Ticket, TicketDomainError, TicketId, UserId},
    ports::{TicketRepository, TicketRepositoryError},
};
use mockable::Clock;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Content type recorded when the client sends none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Errors returned by [`AttachmentService`].
#[derive(Debug, Clone, Error)]
pub enum AttachmentError {
    /// The key or another value is invalid.
    #[error(transparent)]
    Domain(#[from] TicketDomainError),

    /// Metadata persistence failed.
    #[error(transparent)]
    Repository(#[from] TicketRepositoryError),

    /// Blob storage failed.
    #[error(transparent)]
    Blob(#[from] BlobStoreError),

    /// No active ticket has the id.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// No attachment has the key.
    #[error("attachment not found: {0}")]
    NotFound(AttachmentKey),
}

impl AttachmentError {
    /// Classifies the error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::Blob(BlobStoreError::AlreadyExists(_)) => ErrorKind::Conflict,
            Self::Blob(BlobStoreError::NotFound(_))
            | Self::TicketNotFound(_)
            | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Blob(BlobStoreError::Io(_)) => ErrorKind::Internal,
        }
    }
}

/// File to attach to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    key: AttachmentKey,
    file_name: Option<String>,
    content_type: Option<String>,
    content: Vec<u8>,
}

impl UploadRequest {
    /// Creates a request storing `content` under `key`.
    #[must_use]
    pub const fn new(key: AttachmentKey, content: Vec<u8>) -> Self {
        Self {
            key,
            file_name: None,
            content_type: None,
            content,
        }
    }

    /// Sets the original file name. Defaults to the key.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the MIME type. Defaults to `application/octet-stream`.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Attachment content with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Stored metadata.
    pub metadata: FileAttachment,
    /// File bytes.
    pub content: Vec<u8>,
}

/// Stores attachment bytes in a [`BlobStore`] and their metadata in the
/// ticket repository.
pub struct AttachmentService<R, C>
where
    R: TicketRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<C>,
    notifier: TicketNotifier,
    audit: Arc<dyn AuditSink>,
}

impl<R, C> AttachmentService<R, C>
where
    R: TicketRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an attachment service.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<C>,
        notifier: TicketNotifier,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            repository,
            blobs,
            clock,
            notifier,
            audit,
        }
    }

    /// Attaches a file to a ticket.
    ///
    /// The blob is written first; if the metadata insert then fails the blob
    /// is removed again.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::TicketNotFound`] for an unknown ticket and
    /// a conflict when the key is already in use.
    pub async fn upload(
        &self,
        ticket_id: TicketId,
        request: UploadRequest,
        actor: Option<UserId>,
    ) -> Result<FileAttachment, AttachmentError> {
        let ticket = self.load_ticket(ticket_id).await?;
        if self.repository.find_attachment(&request.key).await?.is_some() {
            return Err(BlobStoreError::AlreadyExists(request.key).into());
        }

        let UploadRequest {
            key,
            file_name,
            content_type,
            content,
        } = request;
        let attachment = FileAttachment {
            file_name: file_name.unwrap_or_else(|| key.as_str().to_owned()),
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            size_bytes: u64::try_from(content.len()).unwrap_or(u64::MAX),
            sha256: sha256_hex(&content),
            uploaded_at: self.clock.utc(),
            uploaded_by: actor,
            ticket_id,
            key,
        };

        self.blobs.put(&attachment.key, content).await?;
        if let Err(err) = self.repository.attach_file(&attachment).await {
            if let Err(cleanup) = self.blobs.delete(&attachment.key).await {
                warn!(key = %attachment.key, error = %cleanup, "failed to remove orphaned blob");
            }
            return Err(err.into());
        }

        info!(
            ticket_id = %ticket_id,
            key = %attachment.key,
            size_bytes = attachment.size_bytes,
            "file attached"
        );
        self.notifier.publish(TicketEvent::Updated(ticket.clone()));
        self.record(AuditAction::FileAttached, &ticket, actor).await;
        Ok(attachment)
    }

    /// Reads an attachment with its content.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::NotFound`] when no attachment has the key.
    pub async fn download(&self, key: &AttachmentKey) -> Result<DownloadedFile, AttachmentError> {
        let metadata = self
            .repository
            .find_attachment(key)
            .await?
            .ok_or_else(|| AttachmentError::NotFound(key.clone()))?;
        let content = self.blobs.get(key).await?;
        Ok(DownloadedFile { metadata, content })
    }

    /// Removes an attachment.
    ///
    /// Metadata goes first so the file disappears from the ticket even when
    /// the blob store is unavailable; a blob left behind is logged.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::NotFound`] when no attachment has the key.
    pub async fn remove(
        &self,
        key: &AttachmentKey,
        actor: Option<UserId>,
    ) -> Result<FileAttachment, AttachmentError> {
        let removed = self
            .repository
            .detach_file(key)
            .await
            .map_err(|err| match err {
                TicketRepositoryError::AttachmentNotFound(missing) => {
                    AttachmentError::NotFound(missing)
                }
                other => other.into(),
            })?;
        match self.blobs.delete(key).await {
            Ok(()) | Err(BlobStoreError::NotFound(_)) => {}
            Err(err) => warn!(%key, error = %err, "failed to remove blob"),
        }

        info!(ticket_id = %removed.ticket_id, %key, "file removed");
        if let Some(ticket) = self.repository.find_by_id(removed.ticket_id).await? {
            self.notifier.publish(TicketEvent::Updated(ticket.clone()));
            self.record(AuditAction::FileDetached, &ticket, actor).await;
        }
        Ok(removed)
    }

    async fn load_ticket(&self, id: TicketId) -> Result<Ticket, AttachmentError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AttachmentError::TicketNotFound(id))
    }

    async fn record(&self, action: AuditAction, ticket: &Ticket, actor: Option<UserId>) {
        let entry = AuditEntry::new(action, self.clock.utc())
            .by(actor)
            .on_ticket(ticket.id(), ticket.work_order_id());
        record_best_effort(&*self.audit, entry).await;
    }
}

fn sha256_hex(content: &[u8]) -> String {
    Sha256::digest(content)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

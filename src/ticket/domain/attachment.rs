//! File attachment metadata.

use super::{TicketDomainError, TicketId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-chosen key under which an attachment's bytes are stored.
///
/// Keys double as blob-store file names, so they are restricted to ASCII
/// letters, digits, `.`, `_` and `-`, must not start with `.`, and are at
/// most [`AttachmentKey::MAX_LEN`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttachmentKey(String);

impl AttachmentKey {
    /// Longest accepted key.
    pub const MAX_LEN: usize = 200;

    /// Validates an attachment key.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::InvalidAttachmentKey`] when the key is
    /// empty, too long, starts with `.`, or contains other characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TicketDomainError> {
        let raw = value.into();
        let valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LEN
            && !raw.starts_with('.')
            && raw
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));
        if !valid {
            return Err(TicketDomainError::InvalidAttachmentKey(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AttachmentKey {
    type Error = TicketDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttachmentKey> for String {
    fn from(value: AttachmentKey) -> Self {
        value.0
    }
}

impl AsRef<str> for AttachmentKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AttachmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata of a file attached to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    /// Blob-store key.
    pub key: AttachmentKey,
    /// Ticket the file belongs to.
    pub ticket_id: TicketId,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported at upload.
    pub content_type: String,
    /// Size of the content in bytes.
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 digest of the content.
    pub sha256: String,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
    /// Uploading user.
    pub uploaded_by: Option<UserId>,
}

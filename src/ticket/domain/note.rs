//! Free-text notes appended to a ticket.

use super::{NoteId, TicketDomainError, TicketId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Note that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    /// Ticket the note belongs to.
    pub ticket_id: TicketId,
    /// Author of the note.
    pub author: Option<UserId>,
    /// Note body, trimmed and non-empty.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    /// Validates a note body.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyNote`] when the body is blank.
    pub fn new(
        ticket_id: TicketId,
        author: Option<UserId>,
        body: &str,
        clock: &impl Clock,
    ) -> Result<Self, TicketDomainError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(TicketDomainError::EmptyNote);
        }
        Ok(Self {
            ticket_id,
            author,
            body: trimmed.to_owned(),
            created_at: clock.utc(),
        })
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            ticket_id: self.ticket_id,
            author: self.author,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

/// Stored ticket note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store identifier.
    pub id: NoteId,
    /// Ticket the note belongs to.
    pub ticket_id: TicketId,
    /// Author of the note.
    pub author: Option<UserId>,
    /// Note body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

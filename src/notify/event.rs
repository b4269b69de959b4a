//! Ticket change events.

use crate::ticket::domain::{Ticket, TicketId};
use serde::Serialize;
use std::fmt;

/// Kind of change carried by a [`TicketEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketEventKind {
    /// A ticket was created.
    Created,
    /// A ticket's fields, status, or assignment changed.
    Updated,
    /// A ticket was archived.
    Deleted,
}

impl TicketEventKind {
    /// Returns the internal event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "ticket-created",
            Self::Updated => "ticket-updated",
            Self::Deleted => "ticket-deleted",
        }
    }

    /// Returns the event name used on the client event stream.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Created => "new-ticket",
            Self::Updated => "update-ticket",
            Self::Deleted => "delete-ticket",
        }
    }
}

impl fmt::Display for TicketEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a deletion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedTicket {
    /// Internal id of the archived ticket.
    pub id: TicketId,
}

/// A committed change to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketEvent {
    /// Full ticket after creation.
    Created(Ticket),
    /// Full ticket after the change.
    Updated(Ticket),
    /// Id of the archived ticket.
    Deleted(DeletedTicket),
}

impl TicketEvent {
    /// Builds a deletion event.
    #[must_use]
    pub const fn deleted(id: TicketId) -> Self {
        Self::Deleted(DeletedTicket { id })
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> TicketEventKind {
        match self {
            Self::Created(_) => TicketEventKind::Created,
            Self::Updated(_) => TicketEventKind::Updated,
            Self::Deleted(_) => TicketEventKind::Deleted,
        }
    }

    /// Returns the id of the affected ticket.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        match self {
            Self::Created(ticket) | Self::Updated(ticket) => ticket.id(),
            Self::Deleted(deleted) => deleted.id,
        }
    }

    /// Serialises the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serialisation error; ticket payloads are plain data, so
    /// this only fails on writer errors.
    pub fn payload_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Created(ticket) | Self::Updated(ticket) => serde_json::to_string(ticket),
            Self::Deleted(deleted) => serde_json::to_string(deleted),
        }
    }
}

//! Archived ticket records.

use super::{ClosureCycle, Ticket, TicketId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Copy of a ticket removed from the active set.
///
/// Archive records are append-only; nothing edits them after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedTicket {
    /// Ticket as it was when archived.
    pub ticket: Ticket,
    /// Closure history at archive time, newest first.
    pub closure_history: Vec<ClosureCycle>,
    /// When the ticket was archived.
    pub archived_at: DateTime<Utc>,
    /// User who archived the ticket.
    pub archived_by: Option<UserId>,
}

/// Confirmation returned after archiving a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReceipt {
    /// Archived ticket id.
    pub id: TicketId,
    /// Human-readable confirmation.
    pub message: String,
}

impl ArchiveReceipt {
    /// Builds the receipt for an archived ticket.
    #[must_use]
    pub fn for_ticket(archived: &ArchivedTicket) -> Self {
        Self {
            id: archived.ticket.id(),
            message: format!(
                "ticket {} archived",
                archived.ticket.quality_ticket_id()
            ),
        }
    }
}

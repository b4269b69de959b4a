//! Audit entry values.

use crate::ticket::domain::{TicketId, UserId, WorkOrderId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A ticket was created.
    TicketCreated,
    /// Plain ticket fields were edited.
    TicketUpdated,
    /// The ticket status changed.
    StatusChanged,
    /// The assignee changed.
    TicketAssigned,
    /// The ticket was archived.
    TicketArchived,
    /// A note was added.
    NoteAdded,
    /// A file was attached.
    FileAttached,
    /// A file was removed.
    FileDetached,
}

impl AuditAction {
    /// Returns the action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket_created",
            Self::TicketUpdated => "ticket_updated",
            Self::StatusChanged => "status_changed",
            Self::TicketAssigned => "ticket_assigned",
            Self::TicketArchived => "ticket_archived",
            Self::NoteAdded => "note_added",
            Self::FileAttached => "file_attached",
            Self::FileDetached => "file_detached",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use qualidesk::audit::{AuditAction, AuditEntry};
/// use qualidesk::ticket::domain::{TicketId, UserId, WorkOrderId};
///
/// let entry = AuditEntry::new(AuditAction::TicketArchived, Utc::now())
///     .by(Some(UserId::new(7)))
///     .on_ticket(TicketId::new(3), WorkOrderId::new(1));
///
/// assert_eq!(entry.ticket_id, Some(TicketId::new(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Acting user, when known.
    pub user_id: Option<UserId>,
    /// What happened.
    pub action: AuditAction,
    /// Affected ticket.
    pub ticket_id: Option<TicketId>,
    /// Work order of the affected ticket.
    pub work_order_id: Option<WorkOrderId>,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates an entry with no actor or subject.
    #[must_use]
    pub const fn new(action: AuditAction, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: None,
            action,
            ticket_id: None,
            work_order_id: None,
            timestamp,
        }
    }

    /// Sets the acting user.
    #[must_use]
    pub const fn by(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the affected ticket and its work order.
    #[must_use]
    pub const fn on_ticket(mut self, ticket_id: TicketId, work_order_id: WorkOrderId) -> Self {
        self.ticket_id = Some(ticket_id);
        self.work_order_id = Some(work_order_id);
        self
    }
}

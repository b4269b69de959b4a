//! Ticket read model with its relations loaded.

use super::{ClosureCycle, FileAttachment, Note, Ticket, WorkOrder};
use serde::Serialize;

/// A ticket together with the records that hang off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetails {
    /// The ticket itself.
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Work order the ticket is filed against.
    pub work_order: WorkOrder,
    /// Closure history, newest first.
    pub closures: Vec<ClosureCycle>,
    /// Attached files.
    pub attachments: Vec<FileAttachment>,
    /// Notes in creation order.
    pub notes: Vec<Note>,
}

//! Request payloads accepted by [`super::TicketLifecycleService`].

use crate::ticket::domain::{
    Classification, ClosureFields, TicketEdit, TicketStatus, UserId, WorkOrderId,
};

/// Request to open a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    work_order_id: WorkOrderId,
    description: String,
    classification: Classification,
    initiator: Option<UserId>,
    assignee: Option<UserId>,
}

impl CreateTicketRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(work_order_id: WorkOrderId, description: impl Into<String>) -> Self {
        Self {
            work_order_id,
            description: description.into(),
            classification: Classification::default(),
            initiator: None,
            assignee: None,
        }
    }

    /// Sets the classification references.
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Sets the reporting user. Defaults to the caller.
    #[must_use]
    pub const fn with_initiator(mut self, initiator: UserId) -> Self {
        self.initiator = Some(initiator);
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub(super) const fn work_order_id(&self) -> WorkOrderId {
        self.work_order_id
    }

    pub(super) fn description(&self) -> &str {
        &self.description
    }

    pub(super) fn into_parts(self) -> (Classification, Option<UserId>, Option<UserId>) {
        (self.classification, self.initiator, self.assignee)
    }
}

/// Partial update of a ticket.
///
/// Plain fields are merged first; a requested status then goes through the
/// transition rules, so an assignee set in the same request satisfies the
/// in-progress requirement. Closure fields are only read when the requested
/// status is Closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTicketRequest {
    edit: TicketEdit,
    status: Option<TicketStatus>,
    closure: ClosureFields,
}

impl UpdateTicketRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plain-field edit.
    #[must_use]
    pub fn with_edit(mut self, edit: TicketEdit) -> Self {
        self.edit = edit;
        self
    }

    /// Requests a status change.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Supplies closure fields for a close.
    #[must_use]
    pub fn with_closure(mut self, closure: ClosureFields) -> Self {
        self.closure = closure;
        self
    }

    /// Returns `true` when the request changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edit.is_empty() && self.status.is_none()
    }

    pub(super) fn into_parts(self) -> (TicketEdit, Option<TicketStatus>, ClosureFields) {
        (self.edit, self.status, self.closure)
    }
}

//! Repository port for ticket persistence and the records attached to it.

use crate::error::ErrorKind;
use crate::ticket::domain::{
    ArchivedTicket, AttachmentKey, ClosureCycle, FileAttachment, NewNote, Note, QualityTicketId,
    StatusFilter, Ticket, TicketDraft, TicketId, UserId, WorkOrder, WorkOrderId, WorkOrderSearch,
    WorkOrderSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for ticket repository operations.
pub type TicketRepositoryResult<T> = Result<T, TicketRepositoryError>;

/// Listing criteria for active tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFilter {
    /// Statuses to include.
    pub statuses: StatusFilter,
    /// Restricts the listing to one work order.
    pub work_order_id: Option<WorkOrderId>,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self {
            statuses: StatusFilter::all(),
            work_order_id: None,
        }
    }
}

impl TicketFilter {
    /// Returns whether `ticket` passes the filter.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.statuses.matches(ticket.status())
            && self
                .work_order_id
                .is_none_or(|work_order_id| ticket.work_order_id() == work_order_id)
    }
}

/// Ticket persistence contract.
///
/// Every method that writes more than one row does so atomically: either all
/// rows are committed or none are.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Stores a draft, assigning the internal id and the next quality-ticket
    /// id of its work order.
    ///
    /// Counting the work order's tickets and inserting the new one happen
    /// under a single isolation boundary, so concurrent creations for the same
    /// work order never receive the same sequence.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::WorkOrderNotFound`] when the work order
    /// does not exist and [`TicketRepositoryError::InvalidReference`] when a
    /// classification or user reference is unknown.
    async fn create(&self, draft: TicketDraft) -> TicketRepositoryResult<Ticket>;

    /// Finds an active ticket by internal id.
    async fn find_by_id(&self, id: TicketId) -> TicketRepositoryResult<Option<Ticket>>;

    /// Lists active tickets ordered by internal id.
    async fn list(&self, filter: &TicketFilter) -> TicketRepositoryResult<Vec<Ticket>>;

    /// Persists changes to an existing ticket, appending `closure` in the same
    /// transaction when present.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::NotFound`] when the ticket does not
    /// exist.
    async fn save(
        &self,
        ticket: &Ticket,
        closure: Option<&ClosureCycle>,
    ) -> TicketRepositoryResult<()>;

    /// Copies the ticket and its closure history into the archive and removes
    /// it from the active set.
    ///
    /// The copy is idempotent on the ticket id, so a retried archive after a
    /// partial failure never duplicates the record.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::NotFound`] when the ticket is not
    /// active.
    async fn archive(
        &self,
        id: TicketId,
        archived_by: Option<UserId>,
        archived_at: DateTime<Utc>,
    ) -> TicketRepositoryResult<ArchivedTicket>;

    /// Finds an archived ticket by its former internal id.
    async fn find_archived(&self, id: TicketId) -> TicketRepositoryResult<Option<ArchivedTicket>>;

    /// Returns the closure cycles of a ticket, newest first.
    async fn closure_cycles(&self, id: TicketId) -> TicketRepositoryResult<Vec<ClosureCycle>>;

    /// Finds a work order by id.
    async fn find_work_order(&self, id: WorkOrderId) -> TicketRepositoryResult<Option<WorkOrder>>;

    /// Returns whether a user exists.
    async fn user_exists(&self, id: UserId) -> TicketRepositoryResult<bool>;

    /// Counts active tickets per work order for the given statuses.
    ///
    /// Work orders without matching tickets are omitted; results are ordered
    /// by work order number.
    async fn work_order_summary(
        &self,
        statuses: &StatusFilter,
        search: Option<&WorkOrderSearch>,
    ) -> TicketRepositoryResult<Vec<WorkOrderSummary>>;

    /// Appends a note to a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::NotFound`] when the ticket does not
    /// exist.
    async fn add_note(&self, note: NewNote) -> TicketRepositoryResult<Note>;

    /// Returns the notes of a ticket in creation order.
    async fn notes(&self, id: TicketId) -> TicketRepositoryResult<Vec<Note>>;

    /// Records attachment metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::DuplicateAttachment`] when the key is
    /// taken and [`TicketRepositoryError::NotFound`] when the ticket does not
    /// exist.
    async fn attach_file(&self, attachment: &FileAttachment) -> TicketRepositoryResult<()>;

    /// Finds attachment metadata by key.
    async fn find_attachment(
        &self,
        key: &AttachmentKey,
    ) -> TicketRepositoryResult<Option<FileAttachment>>;

    /// Returns the attachments of a ticket ordered by upload time.
    async fn attachments(&self, id: TicketId) -> TicketRepositoryResult<Vec<FileAttachment>>;

    /// Removes attachment metadata and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::AttachmentNotFound`] when the key is
    /// unknown.
    async fn detach_file(&self, key: &AttachmentKey) -> TicketRepositoryResult<FileAttachment>;
}

/// Errors returned by ticket repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TicketRepositoryError {
    /// The ticket was not found.
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The work order was not found.
    #[error("work order not found: {0}")]
    WorkOrderNotFound(WorkOrderId),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A foreign key did not resolve.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The quality-ticket id is already in use.
    #[error("duplicate quality ticket id: {0}")]
    DuplicateQualityTicketId(QualityTicketId),

    /// The attachment key is already in use.
    #[error("duplicate attachment key: {0}")]
    DuplicateAttachment(AttachmentKey),

    /// The attachment was not found.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(AttachmentKey),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TicketRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::WorkOrderNotFound(_) | Self::AttachmentNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::UserNotFound(_) | Self::InvalidReference(_) => ErrorKind::Validation,
            Self::DuplicateQualityTicketId(_) | Self::DuplicateAttachment(_) => {
                ErrorKind::Conflict
            }
            Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}

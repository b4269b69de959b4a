//! Service-level errors for ticket operations.

use crate::error::ErrorKind;
use crate::ticket::{
    domain::{TicketDomainError, TicketId, UserId, WorkOrderId},
    ports::TicketRepositoryError,
};
use thiserror::Error;

/// Errors returned by ticket services.
#[derive(Debug, Clone, Error)]
pub enum TicketServiceError {
    /// Domain validation or a lifecycle precondition failed.
    #[error(transparent)]
    Domain(#[from] TicketDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TicketRepositoryError),

    /// No active ticket has the id.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// No archived ticket has the id.
    #[error("archived ticket not found: {0}")]
    ArchivedTicketNotFound(TicketId),

    /// The work order does not exist.
    #[error("work order not found: {0}")]
    WorkOrderNotFound(WorkOrderId),

    /// The referenced user does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
}

impl TicketServiceError {
    /// Classifies the error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::TicketNotFound(_)
            | Self::ArchivedTicketNotFound(_)
            | Self::WorkOrderNotFound(_) => ErrorKind::NotFound,
            Self::UnknownUser(_) => ErrorKind::Validation,
        }
    }
}

/// Result type for ticket service operations.
pub type TicketServiceResult<T> = Result<T, TicketServiceError>;

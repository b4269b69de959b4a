//! Error types for ticket domain validation and parsing.

use super::TicketId;
use crate::error::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned while constructing or mutating ticket values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketDomainError {
    /// The description is empty after trimming.
    #[error("ticket description must not be empty")]
    EmptyDescription,

    /// A note body is empty after trimming.
    #[error("note body must not be empty")]
    EmptyNote,

    /// A closure field required to close the ticket is missing or blank.
    #[error("{0} is required to close a ticket")]
    MissingClosureField(&'static str),

    /// Estimated labor hours must be zero or positive.
    #[error("estimated labor hours must not be negative, got {0}")]
    NegativeLaborHours(Decimal),

    /// Estimated labor hours exceed the stored precision or range.
    #[error("estimated labor hours must have at most 2 decimal places and stay below 100000000, got {0}")]
    LaborHoursOutOfRange(Decimal),

    /// A ticket may only be in progress while assigned.
    #[error("ticket {0} must be assigned before it can be in progress")]
    AssigneeRequired(TicketId),

    /// The numeric status code is not one of the known statuses.
    #[error("unknown ticket status code: {0}")]
    UnknownStatusCode(i64),

    /// A status filter string could not be parsed.
    #[error("invalid status filter '{0}', expected comma-separated status codes")]
    InvalidStatusFilter(String),

    /// The work order number cannot be used to build an identifier.
    #[error("invalid work order number '{0}'")]
    InvalidWorkOrderNumber(String),

    /// The quality-ticket identifier does not follow `<workOrder>-<seq>`.
    #[error("invalid quality ticket id '{0}'")]
    InvalidQualityTicketId(String),

    /// Attachment keys are restricted to a safe character set.
    #[error("invalid attachment key '{0}'")]
    InvalidAttachmentKey(String),
}

impl TicketDomainError {
    /// Classifies the error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AssigneeRequired(_) => ErrorKind::PreconditionFailed,
            Self::EmptyDescription
            | Self::EmptyNote
            | Self::MissingClosureField(_)
            | Self::NegativeLaborHours(_)
            | Self::LaborHoursOutOfRange(_)
            | Self::UnknownStatusCode(_)
            | Self::InvalidStatusFilter(_)
            | Self::InvalidWorkOrderNumber(_)
            | Self::InvalidQualityTicketId(_)
            | Self::InvalidAttachmentKey(_) => ErrorKind::Validation,
        }
    }
}

//! Domain model for the quality-ticket lifecycle.
//!
//! Tickets, their closure history, and the identifier scheme live here with
//! no infrastructure dependencies; storage and delivery concerns stay in the
//! adapters.

mod archive;
mod attachment;
mod closure;
mod details;
mod error;
mod identifier;
mod ids;
mod note;
mod status;
mod ticket;
mod work_order;

pub use archive::{ArchiveReceipt, ArchivedTicket};
pub use attachment::{AttachmentKey, FileAttachment};
pub use closure::{ClosureCycle, Resolution, sort_newest_first};
pub use details::TicketDetails;
pub use error::TicketDomainError;
pub use identifier::{QualityTicketId, SEQUENCE_WIDTH, next_sequence};
pub use ids::{
    DivisionId, LaborDepartmentId, NonconformanceTypeId, NoteId, SequenceId, TicketId, UnitId,
    UserId, WorkOrderId,
};
pub use note::{NewNote, Note};
pub use status::{StatusFilter, TicketStatus};
pub use ticket::{
    Classification, ClosureFields, PersistedTicketData, Ticket, TicketDraft, TicketEdit,
    TransitionOutcome,
};
pub use work_order::{WorkOrder, WorkOrderSearch, WorkOrderSummary};

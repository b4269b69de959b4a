//! Application services for ticket lifecycle orchestration.

mod error;
mod lifecycle;
mod requests;
mod summary;

pub use error::{TicketServiceError, TicketServiceResult};
pub use lifecycle::TicketLifecycleService;
pub use requests::{CreateTicketRequest, UpdateTicketRequest};
pub use summary::WorkOrderAggregator;

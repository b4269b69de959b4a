//! Port contracts for ticket lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by ticket services.

pub mod repository;

pub use repository::{TicketFilter, TicketRepository, TicketRepositoryError, TicketRepositoryResult};

//! `PostgreSQL` adapters for ticket lifecycle persistence.

mod conversion;
mod models;
mod repository;
mod schema;

pub use repository::{PostgresTicketRepository, TicketPgPool};

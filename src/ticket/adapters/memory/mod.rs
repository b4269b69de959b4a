//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit tests and for running the service without a database.

mod ticket;

pub use ticket::InMemoryTicketRepository;

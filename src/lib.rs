//! Qualidesk: quality-ticket lifecycle service.
//!
//! Tickets record nonconformances found against production work orders.
//! Each ticket carries a human-facing `<work order>-<seq>` identifier, moves
//! through Open, In Progress, and Closed, keeps a ledger of every closure,
//! and is archived rather than deleted. Connected clients receive committed
//! changes over a server-sent event stream.
//!
//! # Architecture
//!
//! The ticket module follows hexagonal architecture:
//!
//! - **Domain**: lifecycle rules and identifier scheme, free of I/O
//! - **Ports**: the repository trait the services depend on
//! - **Adapters**: `PostgreSQL` and in-memory repositories
//! - **Services**: the lifecycle engine and work order aggregator
//!
//! # Modules
//!
//! - [`ticket`]: tickets, closures, notes, and archive
//! - [`attachment`]: file content and metadata
//! - [`notify`]: change fan-out to live subscribers
//! - [`auth`]: bearer-token identities and roles
//! - [`audit`]: audit trail of ticket changes
//! - [`http`]: REST endpoints and the event stream

pub mod attachment;
pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod server;
pub mod telemetry;
pub mod ticket;

#[cfg(test)]
pub(crate) mod test_support;

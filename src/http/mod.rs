//! HTTP surface: JSON endpoints, attachment transfer, and the event stream.
//!
//! Every endpoint except `/healthz` requires a bearer token. Viewers may
//! read, editors may create and change tickets, and admins may also archive
//! tickets and remove files.

mod caller;
mod dto;
mod error;
mod events;
mod files;
mod router;
mod state;
mod summary;
mod tickets;

pub use caller::{Caller, StreamCaller};
pub use error::ApiError;
pub use router::router;
pub use state::{AppComponents, AppState};

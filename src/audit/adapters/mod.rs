//! Audit sink adapters.

mod log;
mod memory;

pub use log::TracingAuditSink;
pub use memory::InMemoryAuditSink;

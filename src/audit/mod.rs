//! Append-only audit trail of ticket mutations.
//!
//! Services record an [`AuditEntry`] after each committed change. The sink is
//! a port so deployments can route entries to a log pipeline or a table.

pub mod adapters;
mod entry;
mod sink;

pub use entry::{AuditAction, AuditEntry};
pub use sink::{AuditError, AuditSink, record_best_effort};
#[cfg(test)]
pub use sink::MockAuditSink;

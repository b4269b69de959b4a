//! Audit sink that emits entries as structured tracing events.

use crate::audit::{AuditEntry, AuditError, AuditSink};
use async_trait::async_trait;
use tracing::info;

/// Writes each entry on the `audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            target: "audit",
            action = %entry.action,
            user_id = entry.user_id.map(|id| id.value()),
            ticket_id = entry.ticket_id.map(|id| id.value()),
            work_order_id = entry.work_order_id.map(|id| id.value()),
            timestamp = %entry.timestamp.to_rfc3339(),
            "audit"
        );
        Ok(())
    }
}

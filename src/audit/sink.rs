//! Audit sink port.

use super::AuditEntry;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by audit sinks.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    /// The sink could not store the entry.
    #[error("audit sink unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditError {
    /// Wraps a sink failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// Append-only destination for audit entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the entry could not be stored.
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Records `entry`; sink failures are logged at `warn` and swallowed.
pub async fn record_best_effort(sink: &dyn AuditSink, entry: AuditEntry) {
    let action = entry.action;
    if let Err(err) = sink.record(entry).await {
        tracing::warn!(%action, error = %err, "failed to record audit entry");
    }
}

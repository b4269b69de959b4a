//! In-memory audit sink.

use crate::audit::{AuditEntry, AuditError, AuditSink};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Collects entries in memory, for tests and inspection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditSink {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl InMemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| AuditError::unavailable(std::io::Error::other(err.to_string())))?;
        entries.push(entry);
        Ok(())
    }
}

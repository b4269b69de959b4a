//! Work order roll-ups for the dashboard.

use super::{TicketServiceError, TicketServiceResult};
use crate::ticket::{
    domain::{StatusFilter, Ticket, WorkOrderId, WorkOrderSearch, WorkOrderSummary},
    ports::{TicketFilter, TicketRepository},
};
use std::sync::Arc;
use tracing::debug;

/// Aggregates active tickets per work order.
pub struct WorkOrderAggregator<R>
where
    R: TicketRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> WorkOrderAggregator<R>
where
    R: TicketRepository + ?Sized,
{
    /// Creates an aggregator over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Counts matching tickets per work order.
    ///
    /// Only work orders with at least one matching ticket appear; results
    /// are ordered by work order number. `search` is a case-insensitive
    /// substring match on the number.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Repository`] when the query fails.
    pub async fn summary(
        &self,
        statuses: &StatusFilter,
        search: Option<&WorkOrderSearch>,
    ) -> TicketServiceResult<Vec<WorkOrderSummary>> {
        let summaries = self.repository.work_order_summary(statuses, search).await?;
        debug!(work_orders = summaries.len(), "work order summary computed");
        Ok(summaries)
    }

    /// Lists the tickets of one work order with the given statuses.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::WorkOrderNotFound`] when the work order
    /// does not exist.
    pub async fn work_order_tickets(
        &self,
        work_order_id: WorkOrderId,
        statuses: StatusFilter,
    ) -> TicketServiceResult<Vec<Ticket>> {
        if self
            .repository
            .find_work_order(work_order_id)
            .await?
            .is_none()
        {
            return Err(TicketServiceError::WorkOrderNotFound(work_order_id));
        }
        let filter = TicketFilter {
            statuses,
            work_order_id: Some(work_order_id),
        };
        Ok(self.repository.list(&filter).await?)
    }
}

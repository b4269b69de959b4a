//! Work order summary handlers.

use super::dto::{StatusQuery, SummaryQuery};
use super::{ApiError, AppState, Caller};
use crate::auth::Role;
use crate::ticket::domain::{StatusFilter, Ticket, WorkOrderId, WorkOrderSearch, WorkOrderSummary};
use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};

/// `GET /work-orders-summary`
pub async fn work_orders_summary(
    caller: Caller,
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkOrderSummary>>, ApiError> {
    caller.require(Role::Viewer)?;
    let Query(params) = query?;
    let statuses = StatusFilter::parse(params.status.as_deref())?;
    let search = WorkOrderSearch::new(params.search.as_deref());
    let summaries = state.work_orders.summary(&statuses, search.as_ref()).await?;
    Ok(Json(summaries))
}

/// `GET /work-orders/{woId}/tickets`
pub async fn work_order_tickets(
    caller: Caller,
    State(state): State<AppState>,
    path: Result<Path<WorkOrderId>, PathRejection>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    caller.require(Role::Viewer)?;
    let Path(work_order_id) = path?;
    let Query(params) = query?;
    let statuses = StatusFilter::parse(params.status.as_deref())?;
    Ok(Json(
        state
            .work_orders
            .work_order_tickets(work_order_id, statuses)
            .await?,
    ))
}

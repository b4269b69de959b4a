//! Route table.

use super::{AppState, events, files, summary, tickets};
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Builds the application router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::archive_ticket),
        )
        .route("/tickets/{id}/assignee", put(tickets::assign_ticket))
        .route("/tickets/{id}/closures", get(tickets::list_closures))
        .route(
            "/tickets/{id}/notes",
            get(tickets::list_notes).post(tickets::add_note),
        )
        .route("/tickets/{id}/files/{key}", post(files::upload_file))
        .route(
            "/files/{key}",
            get(files::download_file).delete(files::delete_file),
        )
        .route("/archive/tickets/{id}", get(tickets::get_archived_ticket))
        .route("/work-orders-summary", get(summary::work_orders_summary))
        .route(
            "/work-orders/{woId}/tickets",
            get(summary::work_order_tickets),
        )
        .route("/tickets/events", get(events::ticket_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

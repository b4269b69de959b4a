//! Ticket, note, closure, and archive handlers.

use super::dto::{AssignBody, CreateTicketBody, ListQuery, NoteBody, UpdateTicketBody};
use super::{ApiError, AppState, Caller};
use crate::auth::Role;
use crate::ticket::{
    domain::{
        ArchiveReceipt, ArchivedTicket, ClosureCycle, Note, StatusFilter, Ticket, TicketDetails,
        TicketId,
    },
    ports::TicketFilter,
};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

type Body<T> = Result<Json<T>, JsonRejection>;
type TicketPath = Result<Path<TicketId>, PathRejection>;

/// `POST /tickets`
pub async fn create_ticket(
    caller: Caller,
    State(state): State<AppState>,
    body: Body<CreateTicketBody>,
) -> Result<(StatusCode, Json<TicketDetails>), ApiError> {
    let actor = caller.require(Role::Editor)?;
    let Json(payload) = body?;
    let details = state.tickets.create(payload.into(), actor).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// `GET /tickets`
pub async fn list_tickets(
    caller: Caller,
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    caller.require(Role::Viewer)?;
    let Query(params) = query?;
    let statuses = params
        .status
        .as_deref()
        .map_or_else(|| Ok(StatusFilter::all()), |raw| StatusFilter::parse(Some(raw)))?;
    let filter = TicketFilter {
        statuses,
        work_order_id: params.work_order_id,
    };
    Ok(Json(state.tickets.list(&filter).await?))
}

/// `GET /tickets/{id}`
pub async fn get_ticket(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
) -> Result<Json<TicketDetails>, ApiError> {
    caller.require(Role::Viewer)?;
    let Path(id) = path?;
    Ok(Json(state.tickets.get(id).await?))
}

/// `PUT /tickets/{id}`
pub async fn update_ticket(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
    body: Body<UpdateTicketBody>,
) -> Result<Json<TicketDetails>, ApiError> {
    let actor = caller.require(Role::Editor)?;
    let Path(id) = path?;
    let Json(payload) = body?;
    Ok(Json(state.tickets.update(id, payload.into(), actor).await?))
}

/// `PUT /tickets/{id}/assignee`
pub async fn assign_ticket(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
    body: Body<AssignBody>,
) -> Result<Json<TicketDetails>, ApiError> {
    let actor = caller.require(Role::Editor)?;
    let Path(id) = path?;
    let Json(payload) = body?;
    state.tickets.assign(id, payload.assignee, actor).await?;
    Ok(Json(state.tickets.get(id).await?))
}

/// `DELETE /tickets/{id}`
pub async fn archive_ticket(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
) -> Result<Json<ArchiveReceipt>, ApiError> {
    let actor = caller.require(Role::Admin)?;
    let Path(id) = path?;
    Ok(Json(state.tickets.archive(id, actor).await?))
}

/// `GET /archive/tickets/{id}`
pub async fn get_archived_ticket(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
) -> Result<Json<ArchivedTicket>, ApiError> {
    caller.require(Role::Viewer)?;
    let Path(id) = path?;
    Ok(Json(state.tickets.find_archived(id).await?))
}

/// `GET /tickets/{id}/closures`
pub async fn list_closures(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
) -> Result<Json<Vec<ClosureCycle>>, ApiError> {
    caller.require(Role::Viewer)?;
    let Path(id) = path?;
    Ok(Json(state.tickets.closures(id).await?))
}

/// `GET /tickets/{id}/notes`
pub async fn list_notes(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
) -> Result<Json<Vec<Note>>, ApiError> {
    caller.require(Role::Viewer)?;
    let Path(id) = path?;
    Ok(Json(state.tickets.notes(id).await?))
}

/// `POST /tickets/{id}/notes`
pub async fn add_note(
    caller: Caller,
    State(state): State<AppState>,
    path: TicketPath,
    body: Body<NoteBody>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let actor = caller.require(Role::Editor)?;
    let Path(id) = path?;
    let Json(payload) = body?;
    let note = state.tickets.add_note(id, &payload.body, actor).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

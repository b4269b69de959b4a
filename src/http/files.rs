//! Attachment handlers.

use super::dto::{RemovedFile, UploadQuery};
use super::{ApiError, AppState, Caller};
use crate::attachment::UploadRequest;
use crate::auth::Role;
use crate::ticket::domain::{AttachmentKey, FileAttachment, TicketId};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// `POST /tickets/{id}/files/{key}`
///
/// The request body is the raw file; its `Content-Type` is stored with it.
pub async fn upload_file(
    caller: Caller,
    State(state): State<AppState>,
    path: Result<Path<(TicketId, String)>, PathRejection>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    headers: HeaderMap,
    content: Bytes,
) -> Result<(StatusCode, Json<FileAttachment>), ApiError> {
    let actor = caller.require(Role::Editor)?;
    let Path((ticket_id, raw_key)) = path?;
    let Query(params) = query?;
    let key = AttachmentKey::new(raw_key)?;

    let mut request = UploadRequest::new(key, content.to_vec());
    if let Some(file_name) = params.file_name {
        request = request.with_file_name(file_name);
    }
    if let Some(content_type) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        request = request.with_content_type(content_type);
    }

    let attachment = state.attachments.upload(ticket_id, request, actor).await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

/// `GET /files/{key}`
pub async fn download_file(
    caller: Caller,
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    caller.require(Role::Viewer)?;
    let Path(raw_key) = path?;
    let key = AttachmentKey::new(raw_key)?;
    let file = state.attachments.download(&key).await?;
    let content_type = HeaderValue::from_str(&file.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    Ok(([(CONTENT_TYPE, content_type)], file.content).into_response())
}

/// `DELETE /files/{key}`
pub async fn delete_file(
    caller: Caller,
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<RemovedFile>, ApiError> {
    let actor = caller.require(Role::Admin)?;
    let Path(raw_key) = path?;
    let key = AttachmentKey::new(raw_key)?;
    let removed = state.attachments.remove(&key, actor).await?;
    Ok(Json(RemovedFile {
        message: format!("file {} removed", removed.key),
        key: removed.key.to_string(),
    }))
}

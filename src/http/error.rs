//! JSON error responses.

use crate::attachment::AttachmentError;
use crate::auth::AuthError;
use crate::error::ErrorKind;
use crate::ticket::{domain::TicketDomainError, services::TicketServiceError};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message returned for internal failures; the detail is only logged.
const INTERNAL_MESSAGE: &str = "internal server error";

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Ticket service failure.
    #[error(transparent)]
    Ticket(#[from] TicketServiceError),

    /// Attachment service failure.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// Input that failed domain parsing.
    #[error(transparent)]
    Domain(#[from] TicketDomainError),

    /// Authentication or authorisation failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed request.
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::PreconditionFailed => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    /// Returns the HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Ticket(err) => status_for(err.kind()),
            Self::Attachment(err) => status_for(err.kind()),
            Self::Domain(err) => status_for(err.kind()),
            Self::Auth(AuthError::MissingCredentials | AuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            Self::Auth(AuthError::Provider(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        let message = if status.is_server_error() {
            error!(error = %detail, "request failed");
            INTERNAL_MESSAGE
        } else {
            detail.as_str()
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

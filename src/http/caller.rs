//! Request authentication extractors.

use super::{ApiError, AppState};
use crate::auth::{AuthError, Identity, Role};
use crate::ticket::domain::UserId;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::Deserialize;

/// Authenticated caller resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Identity);

impl Caller {
    /// Returns the caller's user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Checks the caller holds at least `role`, returning the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] with [`AuthError::Forbidden`] otherwise.
    pub fn require(&self, role: Role) -> Result<Option<UserId>, ApiError> {
        self.0.require(role)?;
        Ok(Some(self.user_id()))
    }
}

/// Authenticated caller for the event stream.
///
/// Browser `EventSource` cannot set headers, so the token may also arrive as
/// the `accessToken` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCaller(pub Identity);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenQuery {
    access_token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(state: &AppState, supplied: Option<&str>) -> Result<Identity, ApiError> {
    let token = supplied.ok_or(AuthError::MissingCredentials)?;
    state
        .identities
        .identify(token)
        .await?
        .ok_or_else(|| AuthError::InvalidCredentials.into())
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(state, bearer_token(parts)).await.map(Self)
    }
}

impl FromRequestParts<AppState> for StreamCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_token = bearer_token(parts).map(str::to_owned);
        let query_token = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.access_token);
        let identity = authenticate(state, header_token.or(query_token).as_deref()).await?;
        identity.require(Role::Viewer)?;
        Ok(Self(identity))
    }
}

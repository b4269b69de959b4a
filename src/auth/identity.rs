//! Authenticated identities and the provider port.

use super::Role;
use crate::ticket::domain::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Caller resolved from a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Authenticated user.
    pub user_id: UserId,
    /// Granted role.
    pub role: Role,
}

impl Identity {
    /// Creates an identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Checks that the identity holds at least `required`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] when the role is insufficient.
    pub fn require(&self, required: Role) -> Result<(), AuthError> {
        if self.role.permits(required) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                required,
                actual: self.role,
            })
        }
    }
}

/// Authentication and authorisation failures.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No credential was supplied.
    #[error("missing bearer credential")]
    MissingCredentials,

    /// The credential is not recognised.
    #[error("invalid bearer credential")]
    InvalidCredentials,

    /// The caller's role is insufficient.
    #[error("{actual} role cannot perform an action requiring {required}")]
    Forbidden {
        /// Role the action requires.
        required: Role,
        /// Role the caller holds.
        actual: Role,
    },

    /// The identity provider could not be reached or misbehaved.
    #[error("identity provider failure: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    /// Wraps a provider failure.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}

/// Resolves bearer credentials to identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Looks up the identity behind `token`.
    ///
    /// Returns `Ok(None)` when the token is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] when the lookup itself fails.
    async fn identify(&self, token: &str) -> Result<Option<Identity>, AuthError>;
}

//! Identity provider backed by a fixed token table.

use crate::auth::{AuthError, Identity, IdentityProvider};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while loading a token table.
#[derive(Debug, Error)]
pub enum TokenFileError {
    /// The file could not be read.
    #[error("failed to read token file {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a JSON object of token entries.
    #[error("invalid token file {path}: {source}")]
    Parse {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Resolves tokens from an in-memory table.
///
/// The JSON form maps each token to an identity:
///
/// ```json
/// { "s3cret": { "userId": 1, "role": "admin" } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenProvider {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token, replacing any previous identity for it.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    /// Parses a JSON token table.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tokens: HashMap<String, Identity> = serde_json::from_str(json)?;
        Ok(Self { tokens })
    }

    /// Loads a JSON token table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`TokenFileError`] when the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, TokenFileError> {
        let io_error = |source| TokenFileError::Io {
            path: path.to_string(),
            source,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error(std::io::Error::other("path must include a file name")))?;
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
        let contents = dir.read_to_string(file_name).map_err(io_error)?;
        Self::from_json(&contents).map_err(|source| TokenFileError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Iterates over the configured identities.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.tokens.values()
    }

    /// Returns the number of known tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when no tokens are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn identify(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self.tokens.get(token).copied())
    }
}

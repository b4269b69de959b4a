//! Error classification shared by every layer.
//!
//! Each module keeps its own `thiserror` enum; [`ErrorKind`] is the common
//! vocabulary the HTTP boundary maps onto status codes.

use serde::Serialize;
use std::fmt;

/// Caller-facing category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing input.
    Validation,
    /// The referenced record does not exist.
    NotFound,
    /// The request is well formed but the current state forbids it.
    PreconditionFailed,
    /// A uniqueness rule was violated.
    Conflict,
    /// Unexpected failure, including rolled-back transactions.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::PreconditionFailed => "precondition_failed",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Caller roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted to an authenticated caller.
///
/// Roles are ordered: each role can do everything the roles below it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access.
    Viewer,
    /// Create and edit tickets.
    Editor,
    /// Archive tickets and remove files.
    Admin,
}

impl Role {
    /// Returns the role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Returns `true` when this role includes `required`.
    ///
    /// # Examples
    ///
    /// ```
    /// use qualidesk::auth::Role;
    ///
    /// assert!(Role::Admin.permits(Role::Editor));
    /// assert!(!Role::Viewer.permits(Role::Editor));
    /// ```
    #[must_use]
    pub fn permits(self, required: Self) -> bool {
        self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Username prefix that marks a shadow visitor account.
pub const VISITOR_PREFIX: &str = "asiste";

/// Older visitor naming scheme still present in migrated data.
const LEGACY_VISITOR_PREFIX: &str = "visitor_";

/// Maximum username length enforced at the account layer.
pub const MAX_USERNAME_LEN: usize = 150;

/// An account that can authenticate against the system.
///
/// Principals are created by the auth collaborator; this crate only models
/// the mirrored fields. A principal is either an admin, a client owner, or a
/// shadow visitor paired to exactly one client (see `access::Role`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub username: String,
    /// Opaque hash supplied by the auth collaborator. Never a cleartext password.
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Derive the visitor username paired with an owner username.
    ///
    /// Truncated to [`MAX_USERNAME_LEN`] characters so the derived name always
    /// fits the same column as a regular username.
    #[must_use]
    pub fn visitor_username(owner_username: &str) -> String {
        format!("{VISITOR_PREFIX}{owner_username}")
            .chars()
            .take(MAX_USERNAME_LEN)
            .collect()
    }

    /// Whether a username already follows a visitor naming scheme.
    ///
    /// Such principals never get a client profile of their own.
    #[must_use]
    pub fn is_visitor_username(username: &str) -> bool {
        username.starts_with(VISITOR_PREFIX) || username.starts_with(LEGACY_VISITOR_PREFIX)
    }
}

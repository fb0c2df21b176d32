//! Resolved access for a request: who is calling and which roll they see.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Client;
use crate::errors::CoreError;

/// The role a principal resolves to, with the bound client where one exists.
///
/// Resolution precedence lives in `padron-db`: admin flag first, then client
/// ownership, then visitor pairing. An admin carries no bound client and is
/// rejected by the per-client query surface.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Client(Client),
    Visitor(Client),
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client(_) => "client",
            Self::Visitor(_) => "visitor",
        }
    }
}

/// Authenticated caller identity for cross-crate passing.
///
/// Produced by the access resolver in `padron-db`, consumed by `padron-api`
/// and `padron-import`. Contains only resolved data, no auth logic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Access {
    pub principal_id: String,
    pub role: Role,
}

impl Access {
    /// The client whose roll this caller operates on, if any.
    #[must_use]
    pub const fn client(&self) -> Option<&Client> {
        match &self.role {
            Role::Admin => None,
            Role::Client(c) | Role::Visitor(c) => Some(c),
        }
    }

    /// Require a bound client (client owner or visitor).
    ///
    /// Admins fail here: the query surface is strictly per-client.
    pub fn require_client(&self) -> Result<&Client, CoreError> {
        self.client()
            .ok_or_else(|| CoreError::AccessDenied("Invalid user type".to_string()))
    }

    /// Require write access to the roll structure (imports, clears).
    ///
    /// Visitors hold day-of-election rights only: search and toggle.
    pub fn require_import_rights(&self) -> Result<&Client, CoreError> {
        match &self.role {
            Role::Client(c) => Ok(c),
            Role::Visitor(_) => Err(CoreError::AccessDenied(
                "Visitor accounts cannot modify the roll".to_string(),
            )),
            Role::Admin => Err(CoreError::AccessDenied("Invalid user type".to_string())),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

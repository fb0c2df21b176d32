//! Destructive-operation gating.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Shared secret confirming destructive operations: replace-mode imports
    /// and clear-all. Operators distribute it out of band.
    #[serde(default)]
    pub delete_secret: String,
}

impl SecurityConfig {
    /// Check if a delete secret has been provided.
    pub fn is_configured(&self) -> bool {
        !self.delete_secret.is_empty()
    }

    /// Verify a caller-supplied secret. Fails closed: while no secret is
    /// configured, nothing destructive is authorized.
    pub fn verify_delete_secret(&self, candidate: Option<&str>) -> bool {
        !self.delete_secret.is_empty() && candidate == Some(self.delete_secret.as_str())
    }
}

//! Cross-cutting error types for Padron.
//!
//! Access and validation failures share one vocabulary across the workspace.
//! The storage and import crates keep their own error enums and wrap
//! `CoreError` for the cases that belong here.

use thiserror::Error;

/// Errors that can be raised by any Padron crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A lookup by id or username came back empty.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// The caller's role does not grant the attempted operation, or the
    /// target belongs to another client.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Data failed validation (format, required fields, parameters).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (username, or `(client, dni)`).
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl CoreError {
    /// Shorthand for the common lookup-miss case.
    #[must_use]
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

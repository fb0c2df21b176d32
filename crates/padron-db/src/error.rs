//! Storage-layer error type and SQLite error sniffing.

use thiserror::Error;

/// Errors out of the storage layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A query could not be run or its result could not be read.
    #[error("Query failed: {0}")]
    Query(String),

    /// A migration batch did not apply.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A statement that must return a row returned none.
    #[error("No result returned")]
    NoResult,

    /// Domain-level failure: not found, access denied, validation, conflict.
    #[error(transparent)]
    Core(#[from] padron_core::errors::CoreError),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Whether a libSQL error is a UNIQUE constraint violation.
///
/// libsql surfaces SQLite errors as strings; there is no structured error
/// code on this path, so we match the stable message fragment.
#[must_use]
pub fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

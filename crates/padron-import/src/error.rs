//! Import error types for padron-import.

use padron_db::error::DatabaseError;

/// Errors that abort an import run.
///
/// Row-level problems (missing DNI, unparsable mesa/orden, duplicate rows)
/// never surface here; they are recorded as warnings or skips in the summary.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The upload itself is unusable: wrong extension, empty file, missing
    /// required columns, or over the size cap.
    #[error("{0}")]
    Validation(String),

    /// The destructive-action secret was missing or wrong.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Db(#[from] DatabaseError),
}

//! Column readers shared by the repos.
//!
//! libSQL rows are column-indexed; these helpers cover the two conversions
//! that need care: timestamps, which the database stores in two formats,
//! and nullable TEXT.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a TEXT timestamp column as `DateTime<Utc>`.
///
/// Rows written by the application carry RFC 3339; rows defaulted by
/// `CURRENT_TIMESTAMP` carry `"YYYY-MM-DD HH:MM:SS"`. Both read as UTC.
///
/// # Errors
///
/// `DatabaseError::Query` when the value is neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|n| n.and_utc())
        })
        .map_err(|e| {
            DatabaseError::Query(format!("datetime '{s}' is neither RFC 3339 nor SQLite format: {e}"))
        })
}

/// Read a nullable TEXT column, folding empty strings into `None`.
///
/// A plain `get::<String>` errors on SQL NULL; nullable columns go through
/// `Option<String>` here instead.
///
/// # Errors
///
/// `DatabaseError` when the column read itself fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row.get::<Option<String>>(idx)?.filter(|s| !s.is_empty()))
}

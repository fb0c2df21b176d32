//! Shared enums for Padron.
//!
//! All serialized enums use `snake_case` via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ResponseStatus
// ---------------------------------------------------------------------------

/// Outcome discriminant carried in every JSON response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The operation completed and the payload is populated.
    Success,
    /// The lookup key matched nothing in a non-empty roll.
    NotFound,
    /// The client has no voters loaded at all.
    NoData,
    /// The request was rejected or failed; `message` explains why.
    Error,
}

impl ResponseStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::NoData => "no_data",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RowOutcome
// ---------------------------------------------------------------------------

/// What happened to one spreadsheet row during an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RowOutcome {
    /// A new voter row was inserted.
    Created,
    /// An existing voter matched by `(client, dni)` and at least one field changed.
    Updated,
    /// An existing voter matched and no field changed.
    Unchanged,
    /// The row was rejected (missing national ID or name) and logged as a warning.
    Skipped,
}

impl RowOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ZoneSelector
// ---------------------------------------------------------------------------

/// Zone filter for pending-voter listings.
///
/// Parsed from a request parameter rather than serde: the wire value is a
/// plain string where `"all"`/absent and `"unassigned"` are reserved words and
/// anything else is a zone ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneSelector {
    /// Every voter of the client, regardless of zone.
    All,
    /// Only voters without a zone.
    Unassigned,
    /// Only voters in the given zone.
    Zone(String),
}

impl ZoneSelector {
    /// Parse the `zone` request parameter. Absent or empty means all zones.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some("unassigned") => Self::Unassigned,
            Some(id) => Self::Zone(id.to_string()),
        }
    }
}

impl fmt::Display for ZoneSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Unassigned => f.write_str("unassigned"),
            Self::Zone(id) => f.write_str(id),
        }
    }
}

//! JSON response types returned by the query surface.
//!
//! These structs define the wire shape of every endpoint in `padron-api`:
//! voter search, toggles, stats, pending listings, imports, and clears.
//! Every envelope carries a [`ResponseStatus`]; `message` is only populated
//! on errors and misses, and payload fields are omitted when absent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ResponseStatus;

/// Voter fields as exposed over the wire. `zone` is the zone name, when assigned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoterPayload {
    pub id: String,
    pub dni: String,
    pub last_name: String,
    pub first_name: String,
    pub sex: Option<String>,
    pub address: Option<String>,
    pub mesa: Option<i64>,
    pub orden: Option<i64>,
    pub establishment: Option<String>,
    pub voted: bool,
    pub zone: Option<String>,
}

/// Response from a voter search by national ID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SearchVoterResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter: Option<VoterPayload>,
}

/// Response from toggling a voter's voted flag by internal ID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ToggleVotedResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The state after the toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted: Option<bool>,
}

/// Response from the one-way mark-voted-by-national-ID operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MarkVotedResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted: Option<bool>,
}

/// Turnout rollup for one client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClientStats {
    pub total_voters: i64,
    pub voted_count: i64,
    pub percentage: f64,
}

/// Response from the client stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClientStatsResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ClientStats>,
}

/// Turnout rollup for one zone.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ZoneStats {
    pub id: String,
    pub name: String,
    pub total_voters: i64,
    pub voted_count: i64,
    pub percentage: f64,
}

/// Response from the per-zone stats endpoint. Zones are ordered by name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ZoneStatsResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<ZoneStats>>,
}

/// One row in a pending-voters listing, trimmed to the fields a caller needs
/// to find and contact the person.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PendingVoter {
    pub id: String,
    pub dni: String,
    pub last_name: String,
    pub first_name: String,
    pub mesa: Option<i64>,
    pub orden: Option<i64>,
    pub zone: Option<String>,
}

/// One page of pending voters plus pagination bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PendingPage {
    pub page: u32,
    pub page_size: u32,
    /// Total pending voters matching the filter, across all pages.
    pub total: u64,
    pub has_more: bool,
    pub voters: Vec<PendingVoter>,
}

/// Response from the pending-voters listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PendingVotersResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub page: Option<PendingPage>,
}

/// Tally of one import run. Also the report type returned by `padron-import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    /// One entry per skipped or partially parsed row, numbered by file row.
    pub warnings: Vec<String>,
}

/// Response from a spreadsheet import.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ImportSummary>,
}

/// What a clear-all actually deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClearOutcome {
    pub deleted_count: u64,
    pub zones_deleted: u64,
}

/// Response from the secret-gated clear-all endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClearVotersResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ClearOutcome>,
}

/// Turnout percentage rounded to two decimals; `0.0` when the roll is empty.
#[must_use]
pub fn percentage(voted_count: i64, total_voters: i64) -> f64 {
    if total_voters > 0 {
        let ratio = voted_count as f64 / total_voters as f64;
        (ratio * 10_000.0).round() / 100.0
    } else {
        0.0
    }
}

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Zone name used when an import does not target an explicit zone.
pub const DEFAULT_ZONE_NAME: &str = "Unassigned";

/// A named partition of one client's voter roll.
///
/// Zone names are unique per client (case-sensitive). Counters follow the same
/// denormalization contract as [`super::Client`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub total_voters: i64,
    pub voted_count: i64,
    pub created_at: DateTime<Utc>,
}

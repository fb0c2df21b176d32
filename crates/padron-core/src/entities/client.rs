use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Organization name assigned to freshly provisioned clients.
pub const DEFAULT_ORGANIZATION: &str = "radicales";

/// A tenant: one organization's voter roll, owned by one principal.
///
/// `total_voters` and `voted_count` are denormalized rollups maintained by the
/// counter engine in `padron-db`. They are read-optimized and may briefly lag
/// the `voters` table; a full recompute restores them from the ground truth.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Client {
    pub id: String,
    /// Owning principal. Exactly one client per owner.
    pub principal_id: String,
    /// Shadow read-mostly account paired to this client, when provisioned.
    pub visitor_principal_id: Option<String>,
    pub organization_name: String,
    pub total_voters: i64,
    pub voted_count: i64,
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One person on a client's roll, keyed by national ID within that client.
///
/// `voted` is the single mutable piece of operational state; everything else
/// is reference data from the imported spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Voter {
    pub id: String,
    pub client_id: String,
    pub zone_id: Option<String>,
    pub dni: String,
    pub last_name: String,
    pub first_name: String,
    pub sex: Option<String>,
    pub address: Option<String>,
    /// Polling table number, when the source sheet carried one.
    pub mesa: Option<i64>,
    /// Order within the polling table.
    pub orden: Option<i64>,
    pub establishment: Option<String>,
    pub voted: bool,
}

/// Field set for creating or refreshing a voter row, as parsed from one
/// spreadsheet row. Carries no identity or voted state: upserts match on
/// `(client, dni)` and never touch `voted`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoterDraft {
    pub dni: String,
    pub last_name: String,
    pub first_name: String,
    pub sex: Option<String>,
    pub address: Option<String>,
    pub mesa: Option<i64>,
    pub orden: Option<i64>,
    pub establishment: Option<String>,
}

impl VoterDraft {
    /// Whether applying this draft to `existing` (moving it to
    /// `target_zone_id`) would change any stored field.
    ///
    /// Used by the upsert path to report an accurate updated count: a re-run
    /// of an identical import must report zero updates.
    #[must_use]
    pub fn differs_from(&self, existing: &Voter, target_zone_id: Option<&str>) -> bool {
        existing.last_name != self.last_name
            || existing.first_name != self.first_name
            || existing.sex != self.sex
            || existing.address != self.address
            || existing.mesa != self.mesa
            || existing.orden != self.orden
            || existing.establishment != self.establishment
            || existing.zone_id.as_deref() != target_zone_id
    }
}

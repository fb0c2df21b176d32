//! Stats repository: turnout rollups served from the denormalized counters.
//!
//! Reads are self-healing. A stale counter (zeroed while matching voters
//! exist, the shape left behind by data loaded outside the incremental
//! paths) triggers one recompute before the numbers are served; a healthy
//! counter is served as-is without touching the voters table.

use padron_core::responses::{ClientStats, ZoneStats, percentage};

use crate::error::DatabaseError;
use crate::service::PadronService;

impl PadronService {
    /// Client-wide turnout.
    pub async fn client_stats(&self, client_id: &str) -> Result<ClientStats, DatabaseError> {
        if self.client_counters_stale(client_id).await? {
            tracing::warn!(client_id, "client counters stale, recomputing");
            self.recompute_counters(client_id).await?;
        }
        let client = self.get_client(client_id).await?;
        Ok(ClientStats {
            total_voters: client.total_voters,
            voted_count: client.voted_count,
            percentage: percentage(client.voted_count, client.total_voters),
        })
    }

    /// Per-zone turnout, ordered by zone name.
    pub async fn zone_stats(&self, client_id: &str) -> Result<Vec<ZoneStats>, DatabaseError> {
        if self.zone_counters_stale(client_id).await? {
            tracing::warn!(client_id, "zone counters stale, recomputing");
            self.recompute_counters(client_id).await?;
        }
        let zones = self.list_zones(client_id).await?;
        Ok(zones
            .into_iter()
            .map(|z| ZoneStats {
                percentage: percentage(z.voted_count, z.total_voters),
                id: z.id,
                name: z.name,
                total_voters: z.total_voters,
                voted_count: z.voted_count,
            })
            .collect())
    }
}

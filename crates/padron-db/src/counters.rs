//! Denormalized counter engine.
//!
//! Clients and zones carry `total_voters`/`voted_count` rollups of the voters
//! table so stats reads never scan it. Two maintenance paths exist:
//!
//! - **Incremental**: single-statement relative `UPDATE`s (`counter + ?`)
//!   applied alongside toggles and single-row upserts. Hot-path callers log
//!   and swallow failures here; the database CHECK constraints reject any
//!   adjustment that would drive a counter negative or past its total.
//! - **Full recompute**: one transaction that rebuilds both rollup levels
//!   from the voters table. Idempotent; used after bulk imports and by the
//!   self-healing stats reads (`repos::stats`) when drift is detected.

use crate::error::DatabaseError;
use crate::service::PadronService;

impl PadronService {
    /// Shift `voted_count` by `delta` on the client and (if any) zone rollup.
    ///
    /// Relative adjustment in SQL, never read-modify-write in the app: two
    /// concurrent bumps both land.
    pub(crate) async fn apply_voted_delta(
        &self,
        client_id: &str,
        zone_id: Option<&str>,
        delta: i64,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE clients SET voted_count = voted_count + ?1 WHERE id = ?2",
                libsql::params![delta, client_id],
            )
            .await?;
        if let Some(zone_id) = zone_id {
            self.db()
                .conn()
                .execute(
                    "UPDATE zones SET voted_count = voted_count + ?1 WHERE id = ?2",
                    libsql::params![delta, zone_id],
                )
                .await?;
        }
        Ok(())
    }

    /// Bump `total_voters` after a single-row voter insert.
    pub(crate) async fn apply_voter_created(
        &self,
        client_id: &str,
        zone_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE clients SET total_voters = total_voters + 1 WHERE id = ?1",
                [client_id],
            )
            .await?;
        if let Some(zone_id) = zone_id {
            self.db()
                .conn()
                .execute(
                    "UPDATE zones SET total_voters = total_voters + 1 WHERE id = ?1",
                    [zone_id],
                )
                .await?;
        }
        Ok(())
    }

    /// Shift zone rollups when an existing voter moves between zones.
    ///
    /// Client-level counters are unaffected: the voter stays on the same roll.
    /// Each zone is adjusted in one statement so its row never goes through an
    /// inconsistent intermediate state.
    pub(crate) async fn apply_zone_move(
        &self,
        from_zone: Option<&str>,
        to_zone: Option<&str>,
        voted: bool,
    ) -> Result<(), DatabaseError> {
        let voted_delta = i64::from(voted);
        if let Some(zone_id) = from_zone {
            self.db()
                .conn()
                .execute(
                    "UPDATE zones SET total_voters = total_voters - 1,
                                      voted_count = voted_count - ?1
                     WHERE id = ?2",
                    libsql::params![voted_delta, zone_id],
                )
                .await?;
        }
        if let Some(zone_id) = to_zone {
            self.db()
                .conn()
                .execute(
                    "UPDATE zones SET total_voters = total_voters + 1,
                                      voted_count = voted_count + ?1
                     WHERE id = ?2",
                    libsql::params![voted_delta, zone_id],
                )
                .await?;
        }
        Ok(())
    }

    /// Rebuild client and zone counters from the voters table.
    ///
    /// Runs in one transaction so readers never observe a half-updated pair
    /// of rollup levels. Zones with no remaining voters drop to zero.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if either UPDATE or the commit fails.
    pub async fn recompute_counters(&self, client_id: &str) -> Result<(), DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "UPDATE clients SET
                total_voters = (SELECT COUNT(*) FROM voters
                                WHERE voters.client_id = clients.id),
                voted_count = (SELECT COUNT(*) FROM voters
                               WHERE voters.client_id = clients.id AND voters.voted = 1)
             WHERE id = ?1",
            [client_id],
        )
        .await?;
        tx.execute(
            "UPDATE zones SET
                total_voters = (SELECT COUNT(*) FROM voters
                                WHERE voters.zone_id = zones.id),
                voted_count = (SELECT COUNT(*) FROM voters
                               WHERE voters.zone_id = zones.id AND voters.voted = 1)
             WHERE client_id = ?1",
            [client_id],
        )
        .await?;
        tx.commit().await?;
        tracing::debug!(client_id, "counters recomputed from voter table");
        Ok(())
    }

    /// Drift probe for the client rollup: counters at zero while matching
    /// voters exist. A roll where genuinely nobody voted yet reads as clean.
    pub(crate) async fn client_counters_stale(
        &self,
        client_id: &str,
    ) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM clients c
                 WHERE c.id = ?1 AND (
                    (c.total_voters = 0 AND EXISTS (
                        SELECT 1 FROM voters v WHERE v.client_id = c.id))
                 OR (c.voted_count = 0 AND EXISTS (
                        SELECT 1 FROM voters v WHERE v.client_id = c.id AND v.voted = 1))
                 )
                 LIMIT 1",
                [client_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Drift probe across all of a client's zone rollups.
    pub(crate) async fn zone_counters_stale(&self, client_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM zones z
                 WHERE z.client_id = ?1 AND (
                    (z.total_voters = 0 AND EXISTS (
                        SELECT 1 FROM voters v WHERE v.zone_id = z.id))
                 OR (z.voted_count = 0 AND EXISTS (
                        SELECT 1 FROM voters v WHERE v.zone_id = z.id AND v.voted = 1))
                 )
                 LIMIT 1",
                [client_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }
}

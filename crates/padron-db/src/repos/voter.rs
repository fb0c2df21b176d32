//! Voter repository: DNI lookup, voted-state transitions, spreadsheet
//! upserts, pending listings, and the clear-all teardown.
//!
//! Every query is partitioned by `client_id`; a voter ID from another
//! client's roll behaves like a missing row or an access denial, never a hit.

use padron_core::entities::{Voter, VoterDraft};
use padron_core::enums::{RowOutcome, ZoneSelector};
use padron_core::errors::CoreError;
use padron_core::ids;
use padron_core::responses::{ClearOutcome, PendingPage, PendingVoter};

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::PadronService;

/// Smallest page size served by [`PadronService::list_pending`].
pub const MIN_PAGE_SIZE: u32 = 10;
/// Largest page size served by [`PadronService::list_pending`].
pub const MAX_PAGE_SIZE: u32 = 500;

const VOTER_COLUMNS: &str =
    "id, client_id, zone_id, dni, last_name, first_name, sex, address, mesa, orden, establishment, voted";

fn row_to_voter(row: &libsql::Row) -> Result<Voter, DatabaseError> {
    Ok(Voter {
        id: row.get::<String>(0)?,
        client_id: row.get::<String>(1)?,
        zone_id: get_opt_string(row, 2)?,
        dni: row.get::<String>(3)?,
        last_name: row.get::<String>(4)?,
        first_name: row.get::<String>(5)?,
        sex: get_opt_string(row, 6)?,
        address: get_opt_string(row, 7)?,
        mesa: row.get::<Option<i64>>(8)?,
        orden: row.get::<Option<i64>>(9)?,
        establishment: get_opt_string(row, 10)?,
        voted: row.get::<i64>(11)? != 0,
    })
}

impl PadronService {
    /// Fetch a voter by ID.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no row matches.
    pub async fn get_voter(&self, voter_id: &str) -> Result<Voter, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {VOTER_COLUMNS} FROM voters WHERE id = ?1"),
                [voter_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_voter(&row),
            None => Err(CoreError::not_found("voter", voter_id).into()),
        }
    }

    /// Look up a voter by national ID within one client's roll.
    pub async fn find_voter_by_dni(
        &self,
        client_id: &str,
        dni: &str,
    ) -> Result<Option<Voter>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {VOTER_COLUMNS} FROM voters WHERE client_id = ?1 AND dni = ?2"),
                [client_id, dni],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_voter(&row)?)),
            None => Ok(None),
        }
    }

    /// Create or refresh a voter row from one spreadsheet row.
    ///
    /// Matches on `(client_id, dni)`. A new DNI inserts; a known DNI with
    /// identical fields is reported [`RowOutcome::Unchanged`] without a
    /// write; anything else updates reference fields and the zone. `voted`
    /// is never touched, so re-importing a roll keeps turnout state.
    ///
    /// Counter maintenance is incremental and best-effort: a failed bump is
    /// logged and left for the next stats read to repair.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` (wrapped) when `zone_id` names a zone
    /// of a different client.
    pub async fn upsert_voter(
        &self,
        client_id: &str,
        zone_id: Option<&str>,
        draft: &VoterDraft,
    ) -> Result<(RowOutcome, Voter), DatabaseError> {
        if let Some(zone_id) = zone_id {
            let owned = self
                .get_zone(zone_id)
                .await?
                .is_some_and(|z| z.client_id == client_id);
            if !owned {
                return Err(CoreError::Validation(format!(
                    "zone '{zone_id}' does not belong to this client"
                ))
                .into());
            }
        }

        match self.find_voter_by_dni(client_id, &draft.dni).await? {
            None => {
                let id = self.db().generate_id(ids::PREFIX_VOTER).await?;
                self.db()
                    .conn()
                    .execute(
                        "INSERT INTO voters
                             (id, client_id, zone_id, dni, last_name, first_name,
                              sex, address, mesa, orden, establishment)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                        libsql::params![
                            id.as_str(),
                            client_id,
                            zone_id,
                            draft.dni.as_str(),
                            draft.last_name.as_str(),
                            draft.first_name.as_str(),
                            draft.sex.as_deref(),
                            draft.address.as_deref(),
                            draft.mesa,
                            draft.orden,
                            draft.establishment.as_deref()
                        ],
                    )
                    .await?;
                if let Err(err) = self.apply_voter_created(client_id, zone_id).await {
                    tracing::warn!(client_id, dni = %draft.dni, error = %err,
                        "counter bump failed after voter insert");
                }
                let voter = self.get_voter(&id).await?;
                Ok((RowOutcome::Created, voter))
            }
            Some(existing) if !draft.differs_from(&existing, zone_id) => {
                Ok((RowOutcome::Unchanged, existing))
            }
            Some(existing) => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE voters SET
                             zone_id = ?1, last_name = ?2, first_name = ?3, sex = ?4,
                             address = ?5, mesa = ?6, orden = ?7, establishment = ?8
                         WHERE id = ?9",
                        libsql::params![
                            zone_id,
                            draft.last_name.as_str(),
                            draft.first_name.as_str(),
                            draft.sex.as_deref(),
                            draft.address.as_deref(),
                            draft.mesa,
                            draft.orden,
                            draft.establishment.as_deref(),
                            existing.id.as_str()
                        ],
                    )
                    .await?;
                if existing.zone_id.as_deref() != zone_id {
                    if let Err(err) = self
                        .apply_zone_move(existing.zone_id.as_deref(), zone_id, existing.voted)
                        .await
                    {
                        tracing::warn!(client_id, voter_id = %existing.id, error = %err,
                            "zone counter move failed after voter update");
                    }
                }
                let voter = self.get_voter(&existing.id).await?;
                Ok((RowOutcome::Updated, voter))
            }
        }
    }

    /// Flip a voter's voted flag and return the new state.
    ///
    /// A true toggle: calling twice restores the original state and nets the
    /// counters to zero.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown ID, `CoreError::AccessDenied`
    /// when the voter belongs to a different client (both wrapped).
    pub async fn toggle_voted(
        &self,
        client_id: &str,
        voter_id: &str,
    ) -> Result<bool, DatabaseError> {
        let voter = self.get_voter(voter_id).await?;
        if voter.client_id != client_id {
            return Err(CoreError::AccessDenied("Access denied".to_string()).into());
        }

        let new_state = !voter.voted;
        self.db()
            .conn()
            .execute(
                "UPDATE voters SET voted = ?1 WHERE id = ?2",
                libsql::params![new_state, voter.id.as_str()],
            )
            .await?;

        let delta = if new_state { 1 } else { -1 };
        if let Err(err) = self
            .apply_voted_delta(client_id, voter.zone_id.as_deref(), delta)
            .await
        {
            tracing::warn!(client_id, voter_id, error = %err, "voted counter update failed");
        }
        Ok(new_state)
    }

    /// Mark a voter as voted by national ID. One-way and idempotent.
    ///
    /// Returns `None` when no voter matches, otherwise `Some(changed)` where
    /// `changed` is false if the voter had already voted. The counter bump
    /// only happens on an actual transition.
    pub async fn set_voted_by_dni(
        &self,
        client_id: &str,
        dni: &str,
    ) -> Result<Option<bool>, DatabaseError> {
        let Some(voter) = self.find_voter_by_dni(client_id, dni).await? else {
            return Ok(None);
        };

        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE voters SET voted = 1 WHERE id = ?1 AND voted = 0",
                [voter.id.as_str()],
            )
            .await?;
        let changed = affected > 0;
        if changed {
            if let Err(err) = self
                .apply_voted_delta(client_id, voter.zone_id.as_deref(), 1)
                .await
            {
                tracing::warn!(client_id, dni, error = %err, "voted counter update failed");
            }
        }
        Ok(Some(changed))
    }

    /// One page of not-yet-voted voters, optionally narrowed to a zone.
    ///
    /// Ordered by (mesa, orden, dni) with missing mesa/orden last. `page` is
    /// floored at 1 and `page_size` clamped to
    /// [[`MIN_PAGE_SIZE`], [`MAX_PAGE_SIZE`]].
    pub async fn list_pending(
        &self,
        client_id: &str,
        selector: &ZoneSelector,
        page: u32,
        page_size: u32,
    ) -> Result<PendingPage, DatabaseError> {
        let page = page.max(1);
        let page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        let mut conditions = vec!["v.client_id = ?1".to_string(), "v.voted = 0".to_string()];
        let mut params: Vec<libsql::Value> = vec![libsql::Value::Text(client_id.to_string())];
        match selector {
            ZoneSelector::All => {}
            ZoneSelector::Unassigned => conditions.push("v.zone_id IS NULL".to_string()),
            ZoneSelector::Zone(zone_id) => {
                params.push(libsql::Value::Text(zone_id.clone()));
                conditions.push(format!("v.zone_id = ?{}", params.len()));
            }
        }
        let where_clause = conditions.join(" AND ");

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT COUNT(*) FROM voters v WHERE {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total = u64::try_from(row.get::<i64>(0)?).unwrap_or_default();

        params.push(libsql::Value::Integer(i64::from(page_size)));
        let limit_idx = params.len();
        params.push(libsql::Value::Integer(
            i64::from(page - 1) * i64::from(page_size),
        ));
        let offset_idx = params.len();

        let sql = format!(
            "SELECT v.id, v.dni, v.last_name, v.first_name, v.mesa, v.orden, z.name
             FROM voters v LEFT JOIN zones z ON z.id = v.zone_id
             WHERE {where_clause}
             ORDER BY v.mesa IS NULL, v.mesa, v.orden IS NULL, v.orden, v.dni
             LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut voters = Vec::new();
        while let Some(row) = rows.next().await? {
            voters.push(PendingVoter {
                id: row.get::<String>(0)?,
                dni: row.get::<String>(1)?,
                last_name: row.get::<String>(2)?,
                first_name: row.get::<String>(3)?,
                mesa: row.get::<Option<i64>>(4)?,
                orden: row.get::<Option<i64>>(5)?,
                zone: get_opt_string(&row, 6)?,
            });
        }

        Ok(PendingPage {
            page,
            page_size,
            total,
            has_more: u64::from(page) * u64::from(page_size) < total,
            voters,
        })
    }

    /// Delete every voter and zone of one client and zero its counters.
    /// All-or-nothing.
    pub async fn clear_all_voters(
        &self,
        client_id: &str,
    ) -> Result<ClearOutcome, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let deleted_count = tx
            .execute("DELETE FROM voters WHERE client_id = ?1", [client_id])
            .await?;
        let zones_deleted = tx
            .execute("DELETE FROM zones WHERE client_id = ?1", [client_id])
            .await?;
        tx.execute(
            "UPDATE clients SET total_voters = 0, voted_count = 0 WHERE id = ?1",
            [client_id],
        )
        .await?;
        tx.commit().await?;
        tracing::info!(client_id, deleted_count, zones_deleted, "roll cleared");
        Ok(ClearOutcome {
            deleted_count,
            zones_deleted,
        })
    }
}

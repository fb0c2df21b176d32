//! Zone repository: named partitions of a client's roll.
//!
//! Zone names are unique per client and matched case-sensitively, so
//! "CENTRO" and "Centro" are distinct zones.

use padron_core::entities::Zone;
use padron_core::ids;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::parse_datetime;
use crate::service::PadronService;

const ZONE_COLUMNS: &str = "id, client_id, name, total_voters, voted_count, created_at";

fn row_to_zone(row: &libsql::Row) -> Result<Zone, DatabaseError> {
    Ok(Zone {
        id: row.get::<String>(0)?,
        client_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        total_voters: row.get::<i64>(3)?,
        voted_count: row.get::<i64>(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl PadronService {
    pub async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ZONE_COLUMNS} FROM zones WHERE id = ?1"),
                [zone_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_zone(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_zone_by_name(
        &self,
        client_id: &str,
        name: &str,
    ) -> Result<Option<Zone>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ZONE_COLUMNS} FROM zones WHERE client_id = ?1 AND name = ?2"),
                [client_id, name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_zone(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch a zone by name, creating it on first use.
    ///
    /// A unique violation on insert means another writer got there first;
    /// the existing row wins.
    pub async fn get_or_create_zone(
        &self,
        client_id: &str,
        name: &str,
    ) -> Result<Zone, DatabaseError> {
        if let Some(zone) = self.get_zone_by_name(client_id, name).await? {
            return Ok(zone);
        }

        let id = self.db().generate_id(ids::PREFIX_ZONE).await?;
        let result = self
            .db()
            .conn()
            .execute(
                "INSERT INTO zones (id, client_id, name) VALUES (?1, ?2, ?3)",
                libsql::params![id.as_str(), client_id, name],
            )
            .await;
        match result {
            Ok(_) => {
                tracing::debug!(client_id, zone = name, "zone created");
                self.get_zone(&id).await?.ok_or(DatabaseError::NoResult)
            }
            Err(err) if is_unique_violation(&err) => self
                .get_zone_by_name(client_id, name)
                .await?
                .ok_or(DatabaseError::NoResult),
            Err(err) => Err(err.into()),
        }
    }

    /// All of a client's zones, ordered by name.
    pub async fn list_zones(&self, client_id: &str) -> Result<Vec<Zone>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ZONE_COLUMNS} FROM zones WHERE client_id = ?1 ORDER BY name"
                ),
                [client_id],
            )
            .await?;
        let mut zones = Vec::new();
        while let Some(row) = rows.next().await? {
            zones.push(row_to_zone(&row)?);
        }
        Ok(zones)
    }
}

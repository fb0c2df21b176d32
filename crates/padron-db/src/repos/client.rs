//! Client repository: profile lookups and roll-shape probes.

use padron_core::entities::Client;
use padron_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::PadronService;

const CLIENT_COLUMNS: &str =
    "id, principal_id, visitor_principal_id, organization_name, total_voters, voted_count";

fn row_to_client(row: &libsql::Row) -> Result<Client, DatabaseError> {
    Ok(Client {
        id: row.get::<String>(0)?,
        principal_id: row.get::<String>(1)?,
        visitor_principal_id: get_opt_string(row, 2)?,
        organization_name: row.get::<String>(3)?,
        total_voters: row.get::<i64>(4)?,
        voted_count: row.get::<i64>(5)?,
    })
}

impl PadronService {
    /// Fetch a client by ID.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no row matches.
    pub async fn get_client(&self, client_id: &str) -> Result<Client, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
                [client_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_client(&row),
            None => Err(CoreError::not_found("client", client_id).into()),
        }
    }

    /// The client owned by a principal, if any.
    pub async fn get_client_by_principal(
        &self,
        principal_id: &str,
    ) -> Result<Option<Client>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE principal_id = ?1"),
                [principal_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    /// The client a visitor principal is paired to, if any.
    pub async fn get_client_by_visitor(
        &self,
        principal_id: &str,
    ) -> Result<Option<Client>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE visitor_principal_id = ?1"),
                [principal_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    /// Whether the client has any voters loaded at all.
    ///
    /// Distinguishes "no data uploaded yet" from "searched and missed".
    pub async fn has_voters(&self, client_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT EXISTS(SELECT 1 FROM voters WHERE client_id = ?1)",
                [client_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)? != 0)
    }

    pub async fn has_voted_voters(&self, client_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT EXISTS(SELECT 1 FROM voters WHERE client_id = ?1 AND voted = 1)",
                [client_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)? != 0)
    }
}

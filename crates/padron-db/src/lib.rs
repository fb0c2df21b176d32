//! # padron-db
//!
//! libSQL database operations for Padron voter rolls.
//!
//! Handles all relational state: principals, clients, zones, and voters, plus
//! the denormalized counter engine that keeps per-client and per-zone turnout
//! rollups in sync with the voter table.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) — native file-backed
//! storage with `:memory:` databases for tests.

pub mod counters;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Padron state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation; all
/// repository methods live on [`service::PadronService`].
pub struct PadronDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl PadronDb {
    /// Open a local database file, migrating it to the current schema.
    ///
    /// `":memory:"` opens a throwaway database; every test does this.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened or a migration batch does
    /// not apply.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are off by default and per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let padron_db = Self { db, conn };
        padron_db.run_migrations().await?;
        Ok(padron_db)
    }

    /// Borrow the shared libSQL connection.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate an entity ID of the form `"{prefix}-{8 hex chars}"`, e.g.
    /// `"vtr-a3f8b2c1"`. Randomness comes from SQL `randomblob(4)`.
    ///
    /// # Errors
    ///
    /// `DatabaseError::NoResult` when the statement yields no row.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> PadronDb {
        PadronDb::open_local(":memory:").await.unwrap()
    }

    async fn count_in_master(db: &PadronDb, kind: &str, names: &str) -> i64 {
        let mut rows = db
            .conn()
            .query(
                &format!(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = '{kind}' AND name IN ({names})"
                ),
                (),
            )
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn open_creates_the_full_schema() {
        let db = test_db().await;
        let tables =
            count_in_master(&db, "table", "'principals', 'clients', 'zones', 'voters'").await;
        assert_eq!(tables, 4);
    }

    #[tokio::test]
    async fn hot_path_indexes_exist() {
        let db = test_db().await;
        let indexes = count_in_master(
            &db,
            "index",
            "'idx_voters_client_voted', 'idx_voters_client_zone_pending'",
        )
        .await;
        assert_eq!(indexes, 2);
    }

    #[tokio::test]
    async fn reopening_a_file_database_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("padron.db");
        let path_str = path.to_str().unwrap();

        {
            let db = PadronDb::open_local(path_str).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO principals (id, username) VALUES ('usr-t1', 'maria')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = PadronDb::open_local(path_str).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT username FROM principals WHERE id = 'usr-t1'", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().expect("row should persist");
        assert_eq!(row.get::<String>(0).unwrap(), "maria");
    }

    #[tokio::test]
    async fn generated_ids_are_prefixed_hex_and_unique() {
        let db = test_db().await;
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let id = db
                .generate_id(padron_core::ids::PREFIX_VOTER)
                .await
                .unwrap();
            let (prefix, hex) = id.split_once('-').expect("id should contain a dash");
            assert_eq!(prefix, "vtr");
            assert_eq!(hex.len(), 8);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit()), "not hex: {hex}");
            assert!(seen.insert(id), "duplicate generated id");
        }
    }

    #[tokio::test]
    async fn migrations_rerun_cleanly() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn dni_unique_per_client_only() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "INSERT INTO principals (id, username) VALUES ('usr-t1', 'a'), ('usr-t2', 'b');
                 INSERT INTO clients (id, principal_id) VALUES ('cli-t1', 'usr-t1'), ('cli-t2', 'usr-t2');
                 INSERT INTO voters (id, client_id, dni) VALUES ('vtr-t1', 'cli-t1', '30111222');",
            )
            .await
            .unwrap();

        // Same DNI under another client is fine
        db.conn()
            .execute(
                "INSERT INTO voters (id, client_id, dni) VALUES ('vtr-t2', 'cli-t2', '30111222')",
                (),
            )
            .await
            .unwrap();

        // Same DNI under the same client is rejected
        let result = db
            .conn()
            .execute(
                "INSERT INTO voters (id, client_id, dni) VALUES ('vtr-t3', 'cli-t1', '30111222')",
                (),
            )
            .await;
        assert!(result.is_err(), "duplicate (client, dni) should be rejected");
        assert!(crate::error::is_unique_violation(&result.unwrap_err()));
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO voters (id, client_id, dni) VALUES ('vtr-t1', 'cli-missing', '1')",
                (),
            )
            .await;
        assert!(result.is_err(), "voter without client should be rejected");
    }

    #[tokio::test]
    async fn counters_cannot_go_negative() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "INSERT INTO principals (id, username) VALUES ('usr-t1', 'a');
                 INSERT INTO clients (id, principal_id) VALUES ('cli-t1', 'usr-t1');",
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "UPDATE clients SET voted_count = voted_count - 1 WHERE id = 'cli-t1'",
                (),
            )
            .await;
        assert!(result.is_err(), "negative counter should violate CHECK");
    }
}

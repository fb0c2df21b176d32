//! Embedded schema migrations.
//!
//! Migration SQL ships inside the binary via `include_str!` and runs on
//! every open. Statements rely on `IF NOT EXISTS`, so reapplying a batch
//! is harmless.

use crate::PadronDb;
use crate::error::DatabaseError;

/// Ordered (name, batch) pairs. Append only.
const MIGRATIONS: &[(&str, &str)] =
    &[("001_initial", include_str!("../migrations/001_initial.sql"))];

impl PadronDb {
    /// Apply every embedded migration batch in order.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::trace!(migration = name, "batch applied");
        }
        Ok(())
    }
}

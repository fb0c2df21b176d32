//! Service layer hosting all repository methods.
//!
//! `PadronService` wraps `PadronDb` (raw database access). All repo methods
//! are implemented as `impl PadronService` blocks in `repos/` and the counter
//! engine in `counters`.

use crate::PadronDb;
use crate::error::DatabaseError;

/// Orchestrates all voter-roll mutations and queries.
///
/// Mutations that must be atomic (clears, recomputes) open a transaction on
/// the underlying connection; incremental counter updates run as single
/// statements and rely on the self-healing read path when they fail.
pub struct PadronService {
    db: PadronDb,
}

impl PadronService {
    /// Open a local database file and wrap it in a service.
    ///
    /// `db_path` names the libSQL file; `":memory:"` gives a throwaway roll.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = PadronDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `PadronDb` (for testing).
    #[must_use]
    pub const fn from_db(db: PadronDb) -> Self {
        Self { db }
    }

    /// Borrow the wrapped database handle.
    #[must_use]
    pub const fn db(&self) -> &PadronDb {
        &self.db
    }
}

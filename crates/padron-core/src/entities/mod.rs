//! Entity structs for the Padron domain objects.
//!
//! Each entity maps to a table in the libSQL database (see the migrations in
//! `padron-db`). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip and schema generation.

mod client;
mod principal;
mod voter;
mod zone;

pub use client::{Client, DEFAULT_ORGANIZATION};
pub use principal::{MAX_USERNAME_LEN, Principal, VISITOR_PREFIX};
pub use voter::{Voter, VoterDraft};
pub use zone::{DEFAULT_ZONE_NAME, Zone};

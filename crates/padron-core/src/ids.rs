//! ID prefix constants for persisted entities.
//!
//! Every row carries a `"{prefix}-{8 hex chars}"` primary key generated at
//! insert time (see `padron-db`). The prefixes make IDs self-describing in
//! logs and JSON payloads.

pub const PREFIX_PRINCIPAL: &str = "usr";
pub const PREFIX_CLIENT: &str = "cli";
pub const PREFIX_ZONE: &str = "zon";
pub const PREFIX_VOTER: &str = "vtr";

/// All known prefixes, for validation and test sweeps.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_PRINCIPAL, PREFIX_CLIENT, PREFIX_ZONE, PREFIX_VOTER];

/// Check whether `id` carries the expected entity prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.len() > prefix.len() + 1 && id.starts_with(prefix) && id.as_bytes()[prefix.len()] == b'-'
}

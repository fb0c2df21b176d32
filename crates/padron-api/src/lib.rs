//! # padron-api
//!
//! The query surface of Padron. Every operation takes a resolved
//! [`Access`](padron_core::access::Access) and answers with a status
//! envelope from [`padron_core::responses`]; domain failures become
//! `status: "error"` with a user-facing message instead of an `Err`, so a
//! transport layer can serialize whatever comes back without branching.
//!
//! Embedding programs build one [`PadronApi`] at startup (see
//! [`PadronApi::init`]) and share it across requests; the underlying
//! service is cheap to call concurrently.

mod context;
mod endpoints;
mod telemetry;
#[cfg(test)]
mod test_support;

pub use context::PadronApi;
pub use endpoints::stats::PendingParams;
pub use padron_import::{ImportError, ImportRequest};
pub use telemetry::init_tracing;

//! Endpoint modules adding operations to `PadronApi` via `impl` blocks.
//!
//! Every endpoint takes a resolved `Access` and returns an envelope from
//! `padron_core::responses`, never an `Err`: the caller serializes whatever
//! comes back. Messages surfaced to callers keep the inner text of domain
//! errors (access denials, validation); unexpected storage failures are
//! logged and reported verbatim.

pub(crate) mod roll;
pub(crate) mod stats;
pub(crate) mod voters;

use padron_core::errors::CoreError;

/// User-facing text for a guard rejection.
///
/// `CoreError::AccessDenied` prefixes its Display with "Access denied: "; the
/// envelopes carry the bare reason instead, matching what callers show
/// directly in the UI.
pub(crate) fn denial_message(err: &CoreError) -> String {
    match err {
        CoreError::AccessDenied(reason) => reason.clone(),
        other => other.to_string(),
    }
}

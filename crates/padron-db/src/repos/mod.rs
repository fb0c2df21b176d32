//! Repository modules implementing operations for all Padron entities.
//!
//! Each module adds methods to `PadronService` via `impl PadronService` blocks.

pub mod client;
pub mod identity;
pub mod stats;
pub mod voter;
pub mod zone;

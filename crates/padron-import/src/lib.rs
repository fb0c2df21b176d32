//! # padron-import
//!
//! CSV spreadsheet import pipeline for Padron voter rolls.
//!
//! Validates an upload (extension, size cap, required columns) before
//! anything destructive happens, optionally replaces the existing roll
//! behind the destructive-action secret, then streams rows through the
//! registry upsert with row-level tolerance: bad rows become warnings, not
//! failures. Every run ends with a full counter recomputation.
//!
//! The tally of a run is a [`padron_core::responses::ImportSummary`].

mod columns;
mod error;
mod pipeline;

pub use error::ImportError;
pub use pipeline::{ImportRequest, Importer};

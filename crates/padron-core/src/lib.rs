//! # padron-core
//!
//! Core types and error types for Padron.
//!
//! This crate provides the foundational types shared across all Padron crates:
//! - Entity structs for the domain objects (principals, clients, zones, voters)
//! - Access roles resolved from authenticated principals
//! - ID prefix constants
//! - Cross-cutting error types
//! - JSON response types for the query surface

pub mod access;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;

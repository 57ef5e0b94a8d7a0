//! Shared domain types and logic for the HerdScan platform.
//!
//! Everything here is pure: no I/O, no database handles. The db, pipeline
//! and api crates depend on this one, never the other way around.

pub mod error;
pub mod geo;
pub mod pagination;
pub mod prediction;
pub mod roles;
pub mod taxonomy;
pub mod types;

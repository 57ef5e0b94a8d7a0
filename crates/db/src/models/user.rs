//! Minimal identity records.
//!
//! Account lifecycle lives in the external identity provider; these rows
//! exist so scans and confirmations have a stable id to reference.

use herdscan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for creating a user record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub display_name: String,
    /// Defaults to `user` if omitted.
    pub role: Option<String>,
}

//! Breed ancestry edge model and DTO.

use herdscan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `breed_origins` table: a directed child -> parent edge
/// with an optional contribution percentage.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BreedOrigin {
    pub id: DbId,
    pub breed_name: String,
    pub parent_breed_name: String,
    pub contribution_pct: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for creating an ancestry edge. The child breed name comes from the
/// request path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBreedOrigin {
    pub parent_breed_name: String,
    pub contribution_pct: Option<f64>,
}

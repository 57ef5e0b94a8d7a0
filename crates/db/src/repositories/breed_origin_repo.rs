//! Repository for the `breed_origins` table.

use herdscan_core::types::DbId;
use sqlx::PgPool;

use crate::models::breed_origin::{BreedOrigin, CreateBreedOrigin};

/// Column list for breed_origins queries.
const COLUMNS: &str = "id, breed_name, parent_breed_name, contribution_pct, created_at";

/// Provides CRUD operations for breed ancestry edges.
pub struct BreedOriginRepo;

impl BreedOriginRepo {
    /// Insert an ancestry edge, returning the created row.
    ///
    /// Both endpoints must exist in `breeds`; self-loops and duplicate
    /// edges are rejected by the table constraints.
    pub async fn create(
        pool: &PgPool,
        breed_name: &str,
        input: &CreateBreedOrigin,
    ) -> Result<BreedOrigin, sqlx::Error> {
        let query = format!(
            "INSERT INTO breed_origins (breed_name, parent_breed_name, contribution_pct)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BreedOrigin>(&query)
            .bind(breed_name)
            .bind(&input.parent_breed_name)
            .bind(input.contribution_pct)
            .fetch_one(pool)
            .await
    }

    /// List ancestry edges for a breed, ordered by parent name.
    pub async fn list_for_breed(
        pool: &PgPool,
        breed_name: &str,
    ) -> Result<Vec<BreedOrigin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM breed_origins
             WHERE breed_name = $1
             ORDER BY parent_breed_name"
        );
        sqlx::query_as::<_, BreedOrigin>(&query)
            .bind(breed_name)
            .fetch_all(pool)
            .await
    }

    /// Delete an ancestry edge by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM breed_origins WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

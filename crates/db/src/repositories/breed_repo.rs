//! Repository for the `breeds` table.

use sqlx::PgPool;

use crate::models::breed::{Breed, CreateBreed, UpdateBreed};

/// Column list for breeds queries.
const COLUMNS: &str = "name, species, breed_status, temperament, conservation_status, \
    milk_yield_min, milk_yield_max, milk_yield_unit, \
    body_weight_min, body_weight_max, body_weight_unit, \
    description, image_url, created_at, updated_at";

/// Provides CRUD operations for the breed vocabulary.
pub struct BreedRepo;

impl BreedRepo {
    /// Insert a new breed, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBreed) -> Result<Breed, sqlx::Error> {
        let query = format!(
            "INSERT INTO breeds
                (name, species, breed_status, temperament, conservation_status,
                 milk_yield_min, milk_yield_max, milk_yield_unit,
                 body_weight_min, body_weight_max, body_weight_unit,
                 description, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Breed>(&query)
            .bind(&input.name)
            .bind(&input.species)
            .bind(&input.breed_status)
            .bind(&input.temperament)
            .bind(&input.conservation_status)
            .bind(input.milk_yield_min)
            .bind(input.milk_yield_max)
            .bind(&input.milk_yield_unit)
            .bind(input.body_weight_min)
            .bind(input.body_weight_max)
            .bind(&input.body_weight_unit)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a breed by its name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Breed>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM breeds WHERE name = $1");
        sqlx::query_as::<_, Breed>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Whether a breed with this name exists.
    pub async fn exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM breeds WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List the whole vocabulary, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Breed>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM breeds ORDER BY name");
        sqlx::query_as::<_, Breed>(&query).fetch_all(pool).await
    }

    /// Update a breed. Absent DTO fields keep their stored value.
    pub async fn update(
        pool: &PgPool,
        name: &str,
        input: &UpdateBreed,
    ) -> Result<Option<Breed>, sqlx::Error> {
        let query = format!(
            "UPDATE breeds SET
                species = COALESCE($1, species),
                breed_status = COALESCE($2, breed_status),
                temperament = COALESCE($3, temperament),
                conservation_status = COALESCE($4, conservation_status),
                milk_yield_min = COALESCE($5, milk_yield_min),
                milk_yield_max = COALESCE($6, milk_yield_max),
                milk_yield_unit = COALESCE($7, milk_yield_unit),
                body_weight_min = COALESCE($8, body_weight_min),
                body_weight_max = COALESCE($9, body_weight_max),
                body_weight_unit = COALESCE($10, body_weight_unit),
                description = COALESCE($11, description),
                image_url = COALESCE($12, image_url),
                updated_at = now()
             WHERE name = $13
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Breed>(&query)
            .bind(&input.species)
            .bind(&input.breed_status)
            .bind(&input.temperament)
            .bind(&input.conservation_status)
            .bind(input.milk_yield_min)
            .bind(input.milk_yield_max)
            .bind(&input.milk_yield_unit)
            .bind(input.body_weight_min)
            .bind(input.body_weight_max)
            .bind(&input.body_weight_unit)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a breed by name. Returns `true` if a row was deleted.
    ///
    /// Fails with a foreign-key violation while confirmed breeds or
    /// ancestry edges still reference the name.
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM breeds WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `confirmed_breeds` table.
//!
//! The confirmed listing joins back to `scans` so the scan-derived filter
//! axes (flag, helpfulness, submitter) apply to it the same way they apply
//! to the unconfirmed view.

use herdscan_core::pagination::SortOrder;
use herdscan_core::types::DbId;
use sqlx::PgPool;

use crate::models::confirmed_breed::{
    ConfirmedBreed, ConfirmedBreedFilter, CreateConfirmedBreed,
};

/// Column list for confirmed_breeds queries, qualified for the scan join.
const COLUMNS: &str =
    "cb.id, cb.scan_id, cb.image_url, cb.breed_name, cb.confirmed_by, cb.created_at";

/// Provides insert, batch-insert, listing and delete operations for
/// confirmed breeds.
pub struct ConfirmedBreedRepo;

impl ConfirmedBreedRepo {
    /// Insert a single confirmed breed, returning the created row.
    ///
    /// Confirming an already-confirmed scan violates
    /// `uq_confirmed_breeds_scan_id` and surfaces as a database error.
    pub async fn create(
        pool: &PgPool,
        confirmed_by: DbId,
        input: &CreateConfirmedBreed,
    ) -> Result<ConfirmedBreed, sqlx::Error> {
        let query = format!(
            "INSERT INTO confirmed_breeds AS cb
                (scan_id, image_url, breed_name, confirmed_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConfirmedBreed>(&query)
            .bind(input.scan_id)
            .bind(&input.image_url)
            .bind(&input.breed_name)
            .bind(confirmed_by)
            .fetch_one(pool)
            .await
    }

    /// Batch insert multiple confirmed breeds in one statement, all
    /// attributed to the same moderator.
    pub async fn batch_insert(
        pool: &PgPool,
        confirmed_by: DbId,
        entries: &[CreateConfirmedBreed],
    ) -> Result<Vec<ConfirmedBreed>, sqlx::Error> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        // Build a multi-row INSERT statement.
        let mut query =
            "INSERT INTO confirmed_breeds AS cb (scan_id, image_url, breed_name, confirmed_by) VALUES "
                .to_string();
        let mut param_idx = 1u32;
        let mut first = true;

        for _ in entries {
            if !first {
                query.push_str(", ");
            }
            first = false;
            query.push('(');
            for i in 0..4 {
                if i > 0 {
                    query.push_str(", ");
                }
                query.push_str(&format!("${param_idx}"));
                param_idx += 1;
            }
            query.push(')');
        }

        query.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, ConfirmedBreed>(&query);
        for entry in entries {
            q = q
                .bind(entry.scan_id)
                .bind(&entry.image_url)
                .bind(&entry.breed_name)
                .bind(confirmed_by);
        }

        q.fetch_all(pool).await
    }

    /// Find a confirmed breed by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConfirmedBreed>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM confirmed_breeds cb WHERE cb.id = $1");
        sqlx::query_as::<_, ConfirmedBreed>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a confirmation exists for the given scan.
    pub async fn exists_for_scan(pool: &PgPool, scan_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM confirmed_breeds WHERE scan_id = $1)",
        )
        .bind(scan_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a confirmed breed, reopening its source scan as unconfirmed.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM confirmed_breeds WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List confirmed breeds matching the filter, ordered by creation time.
    pub async fn list(
        pool: &PgPool,
        filter: &ConfirmedBreedFilter,
        order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ConfirmedBreed>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_confirmed_filter(filter);
        let dir = order.as_sql();

        let query = format!(
            "SELECT {COLUMNS} FROM confirmed_breeds cb
             LEFT JOIN scans s ON s.id = cb.scan_id
             {where_clause}
             ORDER BY cb.created_at {dir}, cb.id {dir}
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_confirmed_values(sqlx::query_as::<_, ConfirmedBreed>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count confirmed breeds matching the filter.
    pub async fn count(
        pool: &PgPool,
        filter: &ConfirmedBreedFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_confirmed_filter(filter);

        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM confirmed_breeds cb
             LEFT JOIN scans s ON s.id = cb.scan_id
             {where_clause}"
        );

        let q = bind_confirmed_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built confirmed-breed queries.
enum BindValue {
    BigInt(i64),
    Bool(bool),
    Text(String),
}

/// Build a WHERE clause and bind values from the filter.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty if no filters are active, or starts with `WHERE `.
fn build_confirmed_filter(filter: &ConfirmedBreedFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref breed_name) = filter.breed_name {
        conditions.push(format!("cb.breed_name = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(breed_name.clone()));
    }

    if let Some(flagged) = filter.flagged {
        conditions.push(format!("s.flagged = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(flagged));
    }

    if let Some(was_helpful) = filter.was_helpful {
        conditions.push(format!("s.was_helpful = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(was_helpful));
    }

    if let Some(submitter_id) = filter.submitter_id {
        conditions.push(format!("s.submitter_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(submitter_id));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_confirmed_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_confirmed_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

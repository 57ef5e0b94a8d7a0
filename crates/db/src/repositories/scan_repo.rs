//! Repository for the `scans` table.
//!
//! Besides plain CRUD this owns the unconfirmed reconciliation view: scans
//! with no matching `confirmed_breeds` row, excluded database-side via an
//! anti-join so the exclusion holds at any scale.

use herdscan_core::pagination::SortOrder;
use herdscan_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::scan::{CreateScan, Scan, UnconfirmedScanFilter};

/// Column list for scans queries.
const COLUMNS: &str = "id, image_url, predictions, latitude, longitude, \
    accuracy_radius, submitter_id, was_helpful, flagged, flag_reason, created_at";

/// Anti-join that keeps only scans without a confirmation.
const UNCONFIRMED: &str =
    "NOT EXISTS (SELECT 1 FROM confirmed_breeds cb WHERE cb.scan_id = scans.id)";

/// Provides insert, partial-update, and reconciliation-view queries for scans.
pub struct ScanRepo;

impl ScanRepo {
    /// Insert a new scan, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScan) -> Result<Scan, sqlx::Error> {
        let query = format!(
            "INSERT INTO scans
                (image_url, predictions, latitude, longitude, accuracy_radius, submitter_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scan>(&query)
            .bind(&input.image_url)
            .bind(Json(&input.predictions))
            .bind(input.location.map(|g| g.latitude))
            .bind(input.location.map(|g| g.longitude))
            .bind(input.location.map(|g| g.accuracy_radius))
            .bind(input.submitter_id)
            .fetch_one(pool)
            .await
    }

    /// Find a scan by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scans WHERE id = $1");
        sqlx::query_as::<_, Scan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set the helpfulness signal. Repeating the same value is a no-op.
    pub async fn set_helpfulness(
        pool: &PgPool,
        id: DbId,
        was_helpful: bool,
    ) -> Result<Scan, sqlx::Error> {
        let query = format!(
            "UPDATE scans SET was_helpful = $1
             WHERE id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scan>(&query)
            .bind(was_helpful)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Set or clear the inspection flag. Clearing also drops any stored reason.
    pub async fn set_flag(
        pool: &PgPool,
        id: DbId,
        flagged: bool,
        reason: Option<&str>,
    ) -> Result<Scan, sqlx::Error> {
        let query = format!(
            "UPDATE scans SET
                flagged = $1,
                flag_reason = CASE WHEN $1 THEN $2 ELSE NULL END
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scan>(&query)
            .bind(flagged)
            .bind(reason)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List unconfirmed scans matching the filter, ordered by creation time.
    ///
    /// The secondary `id` sort keeps pagination stable when timestamps
    /// collide.
    pub async fn list_unconfirmed(
        pool: &PgPool,
        filter: &UnconfirmedScanFilter,
        order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Scan>, sqlx::Error> {
        let (conditions, bind_values, bind_idx) = build_scan_filter(filter);
        let dir = order.as_sql();

        let query = format!(
            "SELECT {COLUMNS} FROM scans
             WHERE {UNCONFIRMED}{conditions}
             ORDER BY created_at {dir}, id {dir}
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_scan_values(sqlx::query_as::<_, Scan>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count unconfirmed scans matching the filter (for pagination metadata).
    pub async fn count_unconfirmed(
        pool: &PgPool,
        filter: &UnconfirmedScanFilter,
    ) -> Result<i64, sqlx::Error> {
        let (conditions, bind_values, _) = build_scan_filter(filter);

        let query =
            format!("SELECT COUNT(*)::BIGINT FROM scans WHERE {UNCONFIRMED}{conditions}");

        let q = bind_scan_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built scan queries.
enum BindValue {
    BigInt(i64),
    Bool(bool),
}

/// Build `AND ...` conditions and bind values from the filter.
///
/// Returns `(conditions, bind_values, next_bind_index)`. The conditions
/// string is empty or starts with ` AND `, ready to append to the base
/// anti-join WHERE clause.
fn build_scan_filter(filter: &UnconfirmedScanFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions = String::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(flagged) = filter.flagged {
        conditions.push_str(&format!(" AND flagged = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(flagged));
    }

    if let Some(was_helpful) = filter.was_helpful {
        conditions.push_str(&format!(" AND was_helpful = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(was_helpful));
    }

    if let Some(submitter_id) = filter.submitter_id {
        conditions.push_str(&format!(" AND submitter_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(submitter_id));
    }

    (conditions, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_scan_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_scan_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

//! Moderation reconciliation engine.
//!
//! Reads are pure functions of an explicit, serializable query value:
//! `(filters, sort, page) -> (rows, total)`. The caller owns the query as
//! a plain value; the engine holds no session state between reads. The
//! unconfirmed view excludes confirmed scans inside the database query
//! itself, so a scan with a matching confirmation can never appear in a
//! page read that happens after the commit.

use herdscan_core::error::CoreError;
use herdscan_core::pagination::{offset_for_page, Page, SortOrder};
use herdscan_core::types::DbId;
use herdscan_db::models::confirmed_breed::{
    ConfirmedBreed, ConfirmedBreedFilter, CreateConfirmedBreed,
};
use herdscan_db::models::scan::{Scan, UnconfirmedScanFilter};
use herdscan_db::repositories::{BreedRepo, ConfirmedBreedRepo, ScanRepo};
use serde::Deserialize;
use sqlx::PgPool;

/// Fixed page size for both moderation views.
pub const PAGE_SIZE: i64 = 12;

/// Errors from the reconciliation engine.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

fn default_page() -> i64 {
    1
}

/// Query value for one read of the unconfirmed view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnconfirmedQuery {
    pub flagged: Option<bool>,
    pub was_helpful: Option<bool>,
    pub submitter_id: Option<DbId>,
    #[serde(default)]
    pub sort: SortOrder,
    /// 1-indexed page.
    #[serde(default = "default_page")]
    pub page: i64,
}

/// Query value for one read of the confirmed view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmedQuery {
    pub breed_name: Option<String>,
    pub flagged: Option<bool>,
    pub was_helpful: Option<bool>,
    pub submitter_id: Option<DbId>,
    #[serde(default)]
    pub sort: SortOrder,
    /// 1-indexed page.
    #[serde(default = "default_page")]
    pub page: i64,
}

/// One page of scans that have no confirmation yet.
pub async fn unconfirmed_page(
    pool: &PgPool,
    query: &UnconfirmedQuery,
) -> Result<Page<Scan>, ReconcileError> {
    let filter = UnconfirmedScanFilter {
        flagged: query.flagged,
        was_helpful: query.was_helpful,
        submitter_id: query.submitter_id,
    };

    let total = ScanRepo::count_unconfirmed(pool, &filter).await?;
    let rows = ScanRepo::list_unconfirmed(
        pool,
        &filter,
        query.sort,
        PAGE_SIZE,
        offset_for_page(query.page, PAGE_SIZE),
    )
    .await?;

    Ok(Page::new(rows, total, query.page, PAGE_SIZE))
}

/// One page of confirmed breed records.
pub async fn confirmed_page(
    pool: &PgPool,
    query: &ConfirmedQuery,
) -> Result<Page<ConfirmedBreed>, ReconcileError> {
    let filter = ConfirmedBreedFilter {
        breed_name: query.breed_name.clone(),
        flagged: query.flagged,
        was_helpful: query.was_helpful,
        submitter_id: query.submitter_id,
    };

    let total = ConfirmedBreedRepo::count(pool, &filter).await?;
    let rows = ConfirmedBreedRepo::list(
        pool,
        &filter,
        query.sort,
        PAGE_SIZE,
        offset_for_page(query.page, PAGE_SIZE),
    )
    .await?;

    Ok(Page::new(rows, total, query.page, PAGE_SIZE))
}

/// Commit a moderator's breed assignment for a scan.
///
/// The breed must be selected (non-empty) and present in the vocabulary.
/// Confirming an already-confirmed scan is a conflict: the partial unique
/// index makes the second of two racing confirms lose.
pub async fn confirm(
    pool: &PgPool,
    scan_id: DbId,
    breed_name: &str,
    moderator_id: DbId,
) -> Result<ConfirmedBreed, ReconcileError> {
    let breed_name = breed_name.trim();
    if breed_name.is_empty() {
        return Err(CoreError::Precondition("Select a breed before confirming".into()).into());
    }

    let scan = ScanRepo::find_by_id(pool, scan_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "scan",
            id: scan_id,
        })?;

    if !BreedRepo::exists(pool, breed_name).await? {
        return Err(CoreError::Validation(format!(
            "Unknown breed '{breed_name}'"
        ))
        .into());
    }

    let input = CreateConfirmedBreed {
        scan_id: Some(scan.id),
        image_url: scan.image_url.clone(),
        breed_name: breed_name.to_string(),
    };

    match ConfirmedBreedRepo::create(pool, moderator_id, &input).await {
        Ok(confirmed) => {
            tracing::info!(
                scan_id = scan.id,
                breed = %confirmed.breed_name,
                moderator_id,
                "Scan confirmed"
            );
            Ok(confirmed)
        }
        Err(e) if is_duplicate_confirmation(&e) => Err(CoreError::Conflict(format!(
            "Scan {scan_id} already has a confirmed breed"
        ))
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Remove a confirmation, reopening its source scan in the unconfirmed
/// view on the next read.
pub async fn unconfirm(pool: &PgPool, confirmed_id: DbId) -> Result<(), ReconcileError> {
    if ConfirmedBreedRepo::delete(pool, confirmed_id).await? {
        tracing::info!(confirmed_id, "Confirmation removed");
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: "confirmed breed",
            id: confirmed_id,
        }
        .into())
    }
}

/// Whether a sqlx error is the partial unique index rejecting a second
/// confirmation of the same scan.
fn is_duplicate_confirmation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.constraint() == Some("uq_confirmed_breeds_scan_id"))
        .unwrap_or(false)
}

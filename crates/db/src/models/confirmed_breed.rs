//! Confirmed-breed entity model and DTOs.
//!
//! A confirmed breed is a moderator-asserted ground-truth label for an
//! image, optionally linked back to the scan it came from. Bulk reference
//! imports create rows with no source scan.

use herdscan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `confirmed_breeds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConfirmedBreed {
    pub id: DbId,
    /// Absent when the row came from a bulk reference import.
    pub scan_id: Option<DbId>,
    pub image_url: String,
    pub breed_name: String,
    pub confirmed_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for inserting a confirmed breed. The confirming moderator is passed
/// separately by the repository caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConfirmedBreed {
    pub scan_id: Option<DbId>,
    pub image_url: String,
    pub breed_name: String,
}

/// Filter axes for the confirmed listing.
///
/// Scan-derived axes (flag, helpfulness, submitter) match against the
/// source scan; rows without a source scan match only when those axes are
/// unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmedBreedFilter {
    pub breed_name: Option<String>,
    pub flagged: Option<bool>,
    pub was_helpful: Option<bool>,
    pub submitter_id: Option<DbId>,
}

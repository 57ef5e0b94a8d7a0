//! Scan entity model and DTOs.
//!
//! A scan is one completed submission-pipeline run: the archived image URL,
//! the normalized prediction list, optional location enrichment, and the
//! reviewer-mutable helpfulness/flag fields.

use herdscan_core::geo::GeoPoint;
use herdscan_core::prediction::Prediction;
use herdscan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `scans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scan {
    pub id: DbId,
    pub image_url: String,
    /// Normalized prediction list, descending by confidence.
    pub predictions: Json<Vec<Prediction>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_radius: Option<f64>,
    /// Absent for anonymous submissions.
    pub submitter_id: Option<DbId>,
    /// Tri-state helpfulness signal: unset / helpful / not helpful.
    pub was_helpful: Option<bool>,
    pub flagged: bool,
    pub flag_reason: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new scan at the end of a pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScan {
    pub image_url: String,
    pub predictions: Vec<Prediction>,
    pub location: Option<GeoPoint>,
    pub submitter_id: Option<DbId>,
}

/// Filter axes for the unconfirmed-scan listing.
///
/// `None` on any axis means "any". Helpfulness and flag filters are exact
/// matches; scans with an unset helpfulness signal match neither `true`
/// nor `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnconfirmedScanFilter {
    pub flagged: Option<bool>,
    pub was_helpful: Option<bool>,
    pub submitter_id: Option<DbId>,
}

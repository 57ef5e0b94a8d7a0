//! Handlers for scan submission and review feedback.
//!
//! Submission runs the full pipeline (inference -> upload -> persist) for
//! one multipart image. Feedback and flagging are idempotent field-level
//! updates on a persisted scan and require an authenticated identity.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use herdscan_core::types::DbId;
use herdscan_db::models::scan::Scan;
use herdscan_db::repositories::ScanRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Multipart field carrying the image payload.
const IMAGE_FIELD: &str = "image";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the `POST /scans/{id}/feedback` endpoint.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub was_helpful: bool,
}

/// Request body for the `POST /scans/{id}/flag` endpoint.
#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub flagged: bool,
    /// Optional free-text reason. Ignored (and cleared) when unflagging.
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/scans
///
/// Accepts one multipart image, runs the submission pipeline and returns
/// the persisted scan. Anonymous submissions are allowed; a provided
/// token must still be valid.
pub async fn submit_scan(
    State(state): State<AppState>,
    submitter: Option<AuthUser>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Scan>)> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read image field: {e}")))?;
            image = Some(bytes.to_vec());
        }
    }

    let image = image
        .ok_or_else(|| AppError::BadRequest(format!("Missing multipart field '{IMAGE_FIELD}'")))?;

    let mut pipeline = state.new_pipeline();
    let scan = pipeline
        .submit(&image, submitter.map(|u| u.user_id))
        .await?;

    Ok((StatusCode::CREATED, Json(scan)))
}

/// GET /api/v1/scans/{id}
pub async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Scan>> {
    let scan = ScanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(herdscan_core::error::CoreError::NotFound { entity: "scan", id })?;
    Ok(Json(scan))
}

/// POST /api/v1/scans/{id}/feedback
///
/// Records whether the prediction was helpful. Idempotent: repeating the
/// same value leaves the scan unchanged.
pub async fn submit_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<Scan>> {
    let scan = ScanRepo::set_helpfulness(&state.pool, id, input.was_helpful).await?;
    tracing::debug!(scan_id = id, user_id = user.user_id, was_helpful = input.was_helpful, "Feedback recorded");
    Ok(Json(scan))
}

/// POST /api/v1/scans/{id}/flag
///
/// Sets or clears the inspection flag. Clearing drops any stored reason.
pub async fn flag_scan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FlagRequest>,
) -> AppResult<Json<Scan>> {
    let scan = ScanRepo::set_flag(&state.pool, id, input.flagged, input.reason.as_deref()).await?;
    tracing::debug!(scan_id = id, user_id = user.user_id, flagged = input.flagged, "Flag updated");
    Ok(Json(scan))
}

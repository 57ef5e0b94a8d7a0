//! Handlers for the moderation reconciliation views and commit
//! operations.
//!
//! All endpoints require the moderator role. Read queries arrive as plain
//! query parameters and deserialize straight into the engine's explicit
//! query values; no filter state lives on the server.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use herdscan_core::pagination::Page;
use herdscan_core::types::DbId;
use herdscan_db::models::confirmed_breed::ConfirmedBreed;
use herdscan_db::models::scan::Scan;
use herdscan_pipeline::{
    confirm, confirmed_page, import_confirmed, unconfirm, unconfirmed_page, ConfirmedQuery,
    UnconfirmedQuery,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireModerator;
use crate::state::AppState;

/// Multipart field naming the breed a bulk import asserts.
const BREED_FIELD: &str = "breed_name";
/// Multipart field carrying each bulk-import image (repeatable).
const IMAGES_FIELD: &str = "images";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the `POST /moderation/scans/{id}/confirm` endpoint.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub breed_name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/moderation/unconfirmed
///
/// One page of scans awaiting a confirmed breed, with filtering on flag
/// state, helpfulness and submitter, sorted by creation time.
pub async fn list_unconfirmed(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Query(query): Query<UnconfirmedQuery>,
) -> AppResult<Json<Page<Scan>>> {
    let page = unconfirmed_page(&state.pool, &query).await?;
    Ok(Json(page))
}

/// GET /api/v1/moderation/confirmed
///
/// One page of confirmed breed records, with the same filter axes plus an
/// exact breed-name match.
pub async fn list_confirmed(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Query(query): Query<ConfirmedQuery>,
) -> AppResult<Json<Page<ConfirmedBreed>>> {
    let page = confirmed_page(&state.pool, &query).await?;
    Ok(Json(page))
}

/// POST /api/v1/moderation/scans/{id}/confirm
///
/// Commits the moderator's breed assignment. After this the scan no
/// longer appears in the unconfirmed view.
pub async fn confirm_scan(
    State(state): State<AppState>,
    RequireModerator(user): RequireModerator,
    Path(id): Path<DbId>,
    Json(input): Json<ConfirmRequest>,
) -> AppResult<(StatusCode, Json<ConfirmedBreed>)> {
    let confirmed = confirm(&state.pool, id, &input.breed_name, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(confirmed)))
}

/// DELETE /api/v1/moderation/confirmed/{id}
///
/// Removes a confirmation; the source scan reappears in the unconfirmed
/// view on the next read.
pub async fn delete_confirmed(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    unconfirm(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/moderation/bulk-import
///
/// Multipart: one `breed_name` text field plus repeated `images` file
/// fields. Fail-fast: if any upload fails, no rows are inserted.
pub async fn bulk_import(
    State(state): State<AppState>,
    RequireModerator(user): RequireModerator,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<ConfirmedBreed>>)> {
    let mut breed_name: Option<String> = None;
    let mut images: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some(BREED_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read breed name: {e}")))?;
                breed_name = Some(text);
            }
            Some(IMAGES_FIELD) => {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read image field: {e}"))
                })?;
                images.push(bytes.to_vec());
            }
            _ => {}
        }
    }

    let breed_name = breed_name
        .ok_or_else(|| AppError::BadRequest(format!("Missing multipart field '{BREED_FIELD}'")))?;

    let rows = import_confirmed(
        &state.pool,
        state.artifacts.as_ref(),
        &breed_name,
        &images,
        user.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(rows)))
}

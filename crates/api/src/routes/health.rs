//! Liveness endpoint, mounted at the root (not under `/api/v1`).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// Build the `/health` router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// Verifies database connectivity and reports ok.
async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    herdscan_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}

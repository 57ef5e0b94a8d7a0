//! Route definitions for scan endpoints.
//!
//! Mounted at `/scans` within the `/api/v1` tree.
//!
//! ```text
//! POST   /              -> submit_scan
//! GET    /{id}          -> get_scan
//! POST   /{id}/feedback -> submit_feedback
//! POST   /{id}/flag     -> flag_scan
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scans;
use crate::state::AppState;

/// Build the `/scans` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scans::submit_scan))
        .route("/{id}", get(scans::get_scan))
        .route("/{id}/feedback", post(scans::submit_feedback))
        .route("/{id}/flag", post(scans::flag_scan))
}

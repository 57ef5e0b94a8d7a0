//! Route definitions for moderation endpoints.
//!
//! Mounted at `/moderation` within the `/api/v1` tree. Every route
//! requires the moderator role.
//!
//! ```text
//! GET    /unconfirmed        -> list_unconfirmed
//! GET    /confirmed          -> list_confirmed
//! POST   /scans/{id}/confirm -> confirm_scan
//! DELETE /confirmed/{id}     -> delete_confirmed
//! POST   /bulk-import        -> bulk_import
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Build the `/moderation` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/unconfirmed", get(moderation::list_unconfirmed))
        .route("/confirmed", get(moderation::list_confirmed))
        .route("/scans/{id}/confirm", post(moderation::confirm_scan))
        .route("/confirmed/{id}", delete(moderation::delete_confirmed))
        .route("/bulk-import", post(moderation::bulk_import))
}

//! Route definitions, one module per resource, mounted under `/api/v1`.

pub mod breeds;
pub mod health;
pub mod moderation;
pub mod scans;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scans", scans::router())
        .nest("/moderation", moderation::router())
        .nest("/breeds", breeds::router())
}

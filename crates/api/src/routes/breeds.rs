//! Route definitions for the breed vocabulary.
//!
//! Mounted at `/breeds` within the `/api/v1` tree. Reads are public;
//! writes require the moderator role (enforced in the handlers).
//!
//! ```text
//! GET    /                     -> list_breeds
//! POST   /                     -> create_breed
//! GET    /{name}               -> get_breed
//! PATCH  /{name}               -> update_breed
//! DELETE /{name}               -> delete_breed
//! GET    /{name}/origins       -> list_origins
//! POST   /{name}/origins       -> create_origin
//! DELETE /{name}/origins/{id}  -> delete_origin
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::breeds;
use crate::state::AppState;

/// Build the `/breeds` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(breeds::list_breeds).post(breeds::create_breed))
        .route(
            "/{name}",
            get(breeds::get_breed)
                .patch(breeds::update_breed)
                .delete(breeds::delete_breed),
        )
        .route(
            "/{name}/origins",
            get(breeds::list_origins).post(breeds::create_origin),
        )
        .route("/{name}/origins/{id}", delete(breeds::delete_origin))
}

//! Route definitions for the `/radios` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::radio;
use crate::state::AppState;

/// Routes mounted at `/radios`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// PATCH  /{id}    -> patch
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(radio::list).post(radio::create))
        .route(
            "/{id}",
            get(radio::get_by_id)
                .put(radio::update)
                .patch(radio::patch)
                .delete(radio::delete),
        )
}

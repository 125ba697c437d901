//! Route definitions for promotions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::promotion;
use crate::state::AppState;

/// Routes mounted at `/promotions`.
///
/// ```text
/// GET    /              -> list (query, at most one criterion)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PUT    /{id}/valid    -> validate
/// DELETE /{id}/valid    -> invalidate
/// PUT    /{id}/extend   -> extend
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(promotion::list).post(promotion::create))
        .route(
            "/{id}",
            get(promotion::get_by_id)
                .put(promotion::update)
                .delete(promotion::delete),
        )
        .route(
            "/{id}/valid",
            put(promotion::validate).delete(promotion::invalidate),
        )
        .route("/{id}/extend", put(promotion::extend))
}

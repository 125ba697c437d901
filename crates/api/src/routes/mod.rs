pub mod health;
pub mod promotion;

use axum::Router;

use crate::state::AppState;

/// Build the promotion route tree.
///
/// The same tree is mounted at `/promotions` (single-page client) and
/// `/api/promotions` (admin console):
///
/// ```text
/// /promotions                     list/query, create
/// /promotions/{id}                get, update, delete
/// /promotions/{id}/valid          validate (PUT), invalidate (DELETE)
/// /promotions/{id}/extend         extend (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/promotions", promotion::router())
        .nest("/api/promotions", promotion::router())
}

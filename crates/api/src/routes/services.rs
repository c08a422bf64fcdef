//! Route definitions for the `/services` catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// GET    /       -> list (?include_inactive=&category=)
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list).post(services::create))
        .route(
            "/{id}",
            get(services::get_by_id)
                .put(services::update)
                .delete(services::deactivate),
        )
}

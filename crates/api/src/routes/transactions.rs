//! Route definitions for the `/transactions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::transactions;
use crate::state::AppState;

/// Routes mounted at `/transactions`.
///
/// ```text
/// GET  /             -> list (?from=&to=&status=&customer_id=&limit=&offset=)
/// POST /             -> checkout
/// GET  /{id}         -> get_by_id
/// POST /{id}/void    -> void
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transactions::list).post(transactions::checkout))
        .route("/{id}", get(transactions::get_by_id))
        .route("/{id}/void", post(transactions::void))
}

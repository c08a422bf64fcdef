use axum::routing::post;
use axum::Router;

use crate::handlers::seed;
use crate::state::AppState;

/// `POST /seed` -- first-run setup of the owner account and service catalog.
pub fn router() -> Router<AppState> {
    Router::new().route("/seed", post(seed::seed))
}

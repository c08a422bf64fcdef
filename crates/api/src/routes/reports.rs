//! Route definitions for `/reports`.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// GET /daily  -> daily (?date= or ?from=&to=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/daily", get(reports::daily))
}

//! Route definitions for the `/staff` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Routes mounted at `/staff`.
///
/// ```text
/// GET    /              -> list (?include_inactive=)
/// POST   /              -> create (manager)
/// GET    /commissions   -> commission_report (manager)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (manager)
/// DELETE /{id}          -> deactivate (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(staff::list).post(staff::create))
        .route("/commissions", get(staff::commission_report))
        .route(
            "/{id}",
            get(staff::get_by_id)
                .put(staff::update)
                .delete(staff::deactivate),
        )
}

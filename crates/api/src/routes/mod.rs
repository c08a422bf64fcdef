pub mod appointments;
pub mod auth;
pub mod customers;
pub mod health;
pub mod reports;
pub mod seed;
pub mod services;
pub mod staff;
pub mod transactions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/pin-login                                  PIN login (public)
///
/// /appointments                                    list, create
/// /appointments/{id}                               get, update, delete
/// /appointments/{id}/status                        status transition (PATCH)
///
/// /customers                                       list/search, create
/// /customers/{id}                                  get, update, delete
/// /customers/{id}/transactions                     purchase history
///
/// /services                                        list, create
/// /services/{id}                                   get, update, deactivate
///
/// /staff                                           list, create (manager)
/// /staff/commissions                               commission report (manager)
/// /staff/{id}                                      get, update, deactivate (manager)
///
/// /transactions                                    list, checkout
/// /transactions/{id}                               get with items
/// /transactions/{id}/void                          void-and-rollback (manager PIN)
///
/// /reports/daily                                   sales report
///
/// /seed                                            seed owner account + catalog
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/appointments", appointments::router())
        .nest("/customers", customers::router())
        .nest("/services", services::router())
        .nest("/staff", staff::router())
        .nest("/transactions", transactions::router())
        .nest("/reports", reports::router())
        .merge(seed::router())
}

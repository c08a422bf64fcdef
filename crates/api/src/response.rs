//! Response envelopes for API handlers.
//!
//! Single resources are returned as `{ "data": ... }`. Paginated listings add
//! the effective `limit` and `offset` so the client can request the next page.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: customer }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "limit": n, "offset": n }` for paginated listings.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

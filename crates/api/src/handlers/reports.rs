//! Handler for the sales report.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use salon_core::report::{aggregate_sales, SalesReport};
use salon_core::types::Timestamp;
use salon_db::repositories::ReportRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub period_start: Timestamp,
    /// Exclusive.
    pub period_end: Timestamp,
    #[serde(flatten)]
    pub report: SalesReport,
}

/// GET /api/v1/reports/daily?date=YYYY-MM-DD
/// GET /api/v1/reports/daily?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// Defaults to today (UTC). Voided sales are reported separately and do
/// not count toward totals.
pub async fn daily(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = params.resolve()?;
    let transactions = ReportRepo::load_transactions(&state.pool, start, end).await?;
    let report = aggregate_sales(&transactions);

    tracing::debug!(
        %start,
        %end,
        transactions = transactions.len(),
        total_sales = report.total_sales,
        "Sales report built",
    );
    Ok(Json(DataResponse {
        data: ReportResponse {
            period_start: start,
            period_end: end,
            report,
        },
    }))
}

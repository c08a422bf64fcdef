//! Handlers for the `/customers` resource.
//!
//! Contact fields are validated and normalized here; lifetime aggregates are
//! read-only through this API and change only at checkout and void.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use salon_core::error::CoreError;
use salon_core::types::DbId;
use salon_core::validation::{normalize_email, normalize_phone, validate_name, validate_notes};
use salon_db::models::customer::{CreateCustomer, UpdateCustomer};
use salon_db::models::transaction::TransactionFilter;
use salon_db::repositories::{CustomerRepo, TransactionRepo};
use salon_db::{clamp_limit, clamp_offset};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for `GET /customers`.
#[derive(Debug, Deserialize)]
pub struct CustomerSearchParams {
    /// Case-insensitive substring of name, phone or email.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: CreateCustomer) -> Result<CreateCustomer, CoreError> {
    validate_notes(input.notes.as_deref())?;
    Ok(CreateCustomer {
        name: validate_name(&input.name, "name")?,
        phone: normalize_phone(input.phone.as_deref())?,
        email: normalize_email(input.email.as_deref())?,
        notes: input.notes,
    })
}

fn validate_update(input: UpdateCustomer) -> Result<UpdateCustomer, CoreError> {
    validate_notes(input.notes.as_deref())?;
    Ok(UpdateCustomer {
        name: input
            .name
            .as_deref()
            .map(|n| validate_name(n, "name"))
            .transpose()?,
        phone: normalize_phone(input.phone.as_deref())?,
        email: normalize_email(input.email.as_deref())?,
        notes: input.notes,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/customers?q=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CustomerSearchParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let customers = CustomerRepo::search(&state.pool, params.q.as_deref(), limit, offset).await?;
    Ok(Json(PageResponse {
        data: customers,
        limit,
        offset,
    }))
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<impl IntoResponse> {
    let input = validate_create(input)?;
    let customer = CustomerRepo::create(&state.pool, &input).await?;
    tracing::info!(customer_id = customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Customer", id)))?;
    Ok(Json(DataResponse { data: customer }))
}

/// PUT /api/v1/customers/{id}
///
/// Omitted fields are left unchanged.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomer>,
) -> AppResult<impl IntoResponse> {
    let input = validate_update(input)?;
    let customer = CustomerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Customer", id)))?;
    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /api/v1/customers/{id}
///
/// Customers with recorded transactions cannot be deleted (409).
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CustomerRepo::delete(&state.pool, id).await? {
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Customer", id)))
    }
}

/// GET /api/v1/customers/{id}/transactions?limit=&offset=
///
/// Newest first, voided transactions included.
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Customer", id)))?;

    let limit = clamp_limit(page.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(page.offset);
    let filter = TransactionFilter {
        customer_id: Some(id),
        ..TransactionFilter::default()
    };
    let transactions = TransactionRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(PageResponse {
        data: transactions,
        limit,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_normalizes_contact_fields() {
        let input = CreateCustomer {
            name: "  Mai Tran ".into(),
            phone: Some(" 0901 234 567 ".into()),
            email: Some("Mai@Example.COM".into()),
            notes: None,
        };
        let out = validate_create(input).unwrap();
        assert_eq!(out.name, "Mai Tran");
        assert_eq!(out.phone.as_deref(), Some("0901 234 567"));
        assert_eq!(out.email.as_deref(), Some("mai@example.com"));
    }

    #[test]
    fn create_rejects_blank_name() {
        let input = CreateCustomer {
            name: " ".into(),
            phone: None,
            email: None,
            notes: None,
        };
        assert!(matches!(validate_create(input), Err(CoreError::Validation(_))));
    }

    #[test]
    fn update_leaves_absent_fields_absent() {
        let out = validate_update(UpdateCustomer::default()).unwrap();
        assert!(out.name.is_none());
        assert!(out.phone.is_none());
        assert!(out.email.is_none());
    }
}

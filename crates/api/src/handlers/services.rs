//! Handlers for the `/services` catalog.
//!
//! Services are never hard-deleted: past transaction items and appointments
//! reference them, so `DELETE` only deactivates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use salon_core::appointments::validate_duration;
use salon_core::catalog::normalize_category;
use salon_core::error::CoreError;
use salon_core::types::DbId;
use salon_core::validation::{validate_amount, validate_name};
use salon_db::models::service::{CreateService, UpdateService};
use salon_db::repositories::ServiceRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /services`.
#[derive(Debug, Deserialize)]
pub struct ServiceListParams {
    #[serde(default)]
    pub include_inactive: bool,
    pub category: Option<String>,
}

fn validate_create(input: CreateService) -> Result<CreateService, CoreError> {
    validate_amount(input.price, "price")?;
    if let Some(cogs) = input.cogs {
        validate_amount(cogs, "cogs")?;
    }
    if let Some(minutes) = input.duration_minutes {
        validate_duration(minutes)?;
    }
    Ok(CreateService {
        name: validate_name(&input.name, "name")?,
        category: normalize_category(&input.category)?,
        ..input
    })
}

fn validate_update(input: UpdateService) -> Result<UpdateService, CoreError> {
    if let Some(price) = input.price {
        validate_amount(price, "price")?;
    }
    if let Some(cogs) = input.cogs {
        validate_amount(cogs, "cogs")?;
    }
    if let Some(minutes) = input.duration_minutes {
        validate_duration(minutes)?;
    }
    Ok(UpdateService {
        name: input
            .name
            .as_deref()
            .map(|n| validate_name(n, "name"))
            .transpose()?,
        category: input
            .category
            .as_deref()
            .map(normalize_category)
            .transpose()?,
        ..input
    })
}

/// GET /api/v1/services?include_inactive=false&category=HAIR
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ServiceListParams>,
) -> AppResult<impl IntoResponse> {
    let category = params
        .category
        .as_deref()
        .map(normalize_category)
        .transpose()?;
    let services =
        ServiceRepo::list(&state.pool, params.include_inactive, category.as_deref()).await?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /api/v1/services
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateService>,
) -> AppResult<impl IntoResponse> {
    let input = validate_create(input)?;
    let service = ServiceRepo::create(&state.pool, &input).await?;
    tracing::info!(service_id = service.id, name = %service.name, "Service created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// GET /api/v1/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let service = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Service", id)))?;
    Ok(Json(DataResponse { data: service }))
}

/// PUT /api/v1/services/{id}
///
/// Price changes apply to future sales only; recorded items keep the price
/// they were sold at.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateService>,
) -> AppResult<impl IntoResponse> {
    let input = validate_update(input)?;
    let service = ServiceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Service", id)))?;
    Ok(Json(DataResponse { data: service }))
}

/// DELETE /api/v1/services/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ServiceRepo::deactivate(&state.pool, id).await? {
        tracing::info!(service_id = id, "Service deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Service", id)))
    }
}

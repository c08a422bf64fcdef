//! Handlers for the `/appointments` resource.
//!
//! An appointment holds its staff member's calendar while SCHEDULED or
//! CONFIRMED; overlapping bookings for the same staff member are refused.
//! Terminal appointments can no longer be edited.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use salon_core::appointments::{
    end_time, normalize_status, validate_duration, validate_transition, ACTIVE_STATUSES,
};
use salon_core::error::CoreError;
use salon_core::types::{DbId, Timestamp};
use salon_core::validation::{normalize_phone, validate_name, validate_notes};
use salon_db::models::appointment::{AppointmentFilter, CreateAppointment, UpdateAppointment};
use salon_db::models::service::Service;
use salon_db::repositories::{AppointmentRepo, CustomerRepo, ServiceRepo, StaffRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /appointments`.
#[derive(Debug, Deserialize)]
pub struct AppointmentListParams {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
    pub staff_id: Option<DbId>,
}

/// Request body for `POST /appointments`.
///
/// `customer_name` may be omitted when `customer_id` is given; it is then
/// copied from the customer record. `duration_minutes` defaults to the
/// service duration.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub customer_id: Option<DbId>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service_id: DbId,
    pub staff_id: Option<DbId>,
    pub scheduled_at: Timestamp,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// Request body for `PATCH /appointments/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_service(state: &AppState, id: DbId) -> AppResult<Service> {
    ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Service", id)))
}

async fn ensure_staff_exists(state: &AppState, id: DbId) -> AppResult<()> {
    let staff = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Staff", id)))?;
    if !staff.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Staff member '{}' is inactive",
            staff.name
        ))));
    }
    Ok(())
}

/// Refuse a booking that overlaps another active appointment of `staff_id`.
async fn ensure_no_conflict(
    state: &AppState,
    staff_id: DbId,
    start: Timestamp,
    minutes: i32,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    let conflicts = AppointmentRepo::find_staff_conflicts(
        &state.pool,
        staff_id,
        start,
        end_time(start, minutes),
        exclude_id,
    )
    .await?;
    if let Some(existing) = conflicts.first() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Staff {staff_id} already has appointment {} at {}",
            existing.id, existing.scheduled_at
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/appointments?date=&from=&to=&status=&staff_id=
///
/// Ordered by start time. Without a date range, all appointments are listed.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AppointmentListParams>,
) -> AppResult<impl IntoResponse> {
    let range = DateRangeParams {
        date: params.date,
        from: params.from,
        to: params.to,
    };
    let (from, to) = if range.is_empty() {
        (None, None)
    } else {
        let (start, end) = range.resolve()?;
        (Some(start), Some(end))
    };
    let filter = AppointmentFilter {
        from,
        to,
        status: params.status.as_deref().map(normalize_status).transpose()?,
        staff_id: params.staff_id,
    };
    let appointments = AppointmentRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: appointments }))
}

/// POST /api/v1/appointments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAppointmentRequest>,
) -> AppResult<impl IntoResponse> {
    validate_notes(input.notes.as_deref())?;
    let service = find_service(&state, input.service_id).await?;
    if !service.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Service '{}' is no longer offered",
            service.name
        ))));
    }

    let customer = match input.customer_id {
        Some(id) => Some(
            CustomerRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(AppError::Core(CoreError::not_found("Customer", id)))?,
        ),
        None => None,
    };
    let customer_name = match (input.customer_name.as_deref(), &customer) {
        (Some(name), _) => validate_name(name, "customer_name")?,
        (None, Some(c)) => c.name.clone(),
        (None, None) => {
            return Err(AppError::Core(CoreError::validation(
                "customer_name is required without customer_id",
            )))
        }
    };
    let customer_phone = match normalize_phone(input.customer_phone.as_deref())? {
        Some(phone) => Some(phone),
        None => customer.as_ref().and_then(|c| c.phone.clone()),
    };

    let duration_minutes = input.duration_minutes.unwrap_or(service.duration_minutes);
    validate_duration(duration_minutes)?;

    if let Some(staff_id) = input.staff_id {
        ensure_staff_exists(&state, staff_id).await?;
        ensure_no_conflict(&state, staff_id, input.scheduled_at, duration_minutes, None).await?;
    }

    let create = CreateAppointment {
        customer_id: input.customer_id,
        customer_name,
        customer_phone,
        service_id: service.id,
        staff_id: input.staff_id,
        scheduled_at: input.scheduled_at,
        duration_minutes,
        notes: input.notes,
    };
    let appointment = AppointmentRepo::create(&state.pool, &create).await?;

    tracing::info!(
        appointment_id = appointment.id,
        staff_id = ?appointment.staff_id,
        scheduled_at = %appointment.scheduled_at,
        "Appointment booked",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: appointment })))
}

/// GET /api/v1/appointments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let appointment = AppointmentRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Appointment", id)))?;
    Ok(Json(DataResponse { data: appointment }))
}

/// PUT /api/v1/appointments/{id}
///
/// Edit or reschedule. Omitted fields are left unchanged; the staff
/// calendar is re-checked against the resulting slot.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAppointment>,
) -> AppResult<impl IntoResponse> {
    let current = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Appointment", id)))?;
    if !ACTIVE_STATUSES.contains(&current.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot modify a {} appointment",
            current.status
        ))));
    }

    validate_notes(input.notes.as_deref())?;
    if let Some(service_id) = input.service_id {
        find_service(&state, service_id).await?;
    }
    if let Some(customer_id) = input.customer_id {
        CustomerRepo::find_by_id(&state.pool, customer_id)
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Customer", customer_id)))?;
    }
    let duration_minutes = input.duration_minutes.unwrap_or(current.duration_minutes);
    validate_duration(duration_minutes)?;

    let staff_id = input.staff_id.or(current.staff_id);
    if let Some(staff_id) = staff_id {
        if input.staff_id.is_some() {
            ensure_staff_exists(&state, staff_id).await?;
        }
        let start = input.scheduled_at.unwrap_or(current.scheduled_at);
        ensure_no_conflict(&state, staff_id, start, duration_minutes, Some(id)).await?;
    }

    let update = UpdateAppointment {
        customer_name: input
            .customer_name
            .as_deref()
            .map(|n| validate_name(n, "customer_name"))
            .transpose()?,
        customer_phone: normalize_phone(input.customer_phone.as_deref())?,
        ..input
    };
    let appointment = AppointmentRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Appointment", id)))?;
    Ok(Json(DataResponse { data: appointment }))
}

/// PATCH /api/v1/appointments/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = normalize_status(&input.status)?;
    let current = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Appointment", id)))?;
    validate_transition(&current.status, &status)?;

    let appointment = AppointmentRepo::update_status(&state.pool, id, &status)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Appointment", id)))?;

    tracing::info!(
        appointment_id = id,
        from = %current.status,
        to = %appointment.status,
        "Appointment status changed",
    );
    Ok(Json(DataResponse { data: appointment }))
}

/// DELETE /api/v1/appointments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AppointmentRepo::delete(&state.pool, id).await? {
        tracing::info!(appointment_id = id, "Appointment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Appointment", id)))
    }
}

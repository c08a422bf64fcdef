//! Handlers for the `/staff` resource and the commission report.
//!
//! Listing and lookup are open to any terminal; changes to staff records
//! and the commission report require a manager or admin token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use salon_core::commission::{summarize_commissions, CommissionEntry, StaffCommissionSummary};
use salon_core::error::CoreError;
use salon_core::money;
use salon_core::roles::{StaffRole, ALL_ROLES};
use salon_core::types::{DbId, Timestamp};
use salon_core::validation::{normalize_phone, validate_name, validate_pin};
use salon_db::models::staff::{CreateStaff, Staff, StaffResponse, UpdateStaff};
use salon_db::repositories::{CommissionRepo, StaffRepo};
use serde::{Deserialize, Serialize};

use crate::auth::pin::{find_by_pin, hash_pin};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthStaff;
use crate::middleware::rbac::RequireManager;
use crate::query::{DateRangeParams, IncludeInactiveParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /staff`.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub role: String,
    pub pin: String,
    pub phone: Option<String>,
}

/// Request body for `PUT /staff/{id}`. A present `pin` replaces the PIN.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub pin: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /staff/commissions`.
#[derive(Debug, Deserialize)]
pub struct CommissionReportParams {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    pub staff_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct CommissionReport {
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub total_commission: f64,
    pub staff: Vec<StaffCommissionSummary>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_role(value: &str) -> Result<StaffRole, CoreError> {
    StaffRole::parse(value).ok_or_else(|| {
        CoreError::Validation(format!(
            "role must be one of {}, got '{value}'",
            ALL_ROLES.join(", ")
        ))
    })
}

/// Only an admin may create or promote another admin.
fn ensure_can_assign(actor: &AuthStaff, role: StaffRole) -> Result<(), CoreError> {
    if role == StaffRole::Admin && StaffRole::parse(&actor.role) != Some(StaffRole::Admin) {
        return Err(CoreError::Forbidden(
            "Only an admin can assign the ADMIN role".into(),
        ));
    }
    Ok(())
}

/// Only an admin may change or deactivate an admin's record.
fn ensure_can_manage(actor: &AuthStaff, target: &Staff) -> Result<(), CoreError> {
    if StaffRole::parse(&target.role) == Some(StaffRole::Admin)
        && StaffRole::parse(&actor.role) != Some(StaffRole::Admin)
    {
        return Err(CoreError::Forbidden(
            "Only an admin can change an admin's record".into(),
        ));
    }
    Ok(())
}

/// Staff may not deactivate their own record.
fn ensure_not_self(actor: &AuthStaff, target_id: DbId) -> Result<(), AppError> {
    if actor.staff_id == target_id {
        return Err(AppError::BadRequest("Cannot deactivate yourself".into()));
    }
    Ok(())
}

async fn find_staff(state: &AppState, id: DbId) -> AppResult<Staff> {
    StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Staff", id)))
}

/// Reject a PIN already used by another active staff member, since login
/// identifies staff by PIN alone.
async fn ensure_pin_unused(state: &AppState, pin: &str, except: Option<DbId>) -> AppResult<()> {
    let active = StaffRepo::list(&state.pool, false).await?;
    let others: Vec<_> = active
        .into_iter()
        .filter(|s| Some(s.id) != except)
        .collect();
    if find_by_pin(pin, &others).is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "PIN is already in use by another staff member".into(),
        )));
    }
    Ok(())
}

fn hash(pin: &str) -> AppResult<String> {
    hash_pin(pin).map_err(|e| AppError::InternalError(format!("PIN hashing failed: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/staff?include_inactive=false
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let staff = StaffRepo::list(&state.pool, params.include_inactive).await?;
    let data: Vec<StaffResponse> = staff.iter().map(StaffResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/staff/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let staff = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Staff", id)))?;
    Ok(Json(DataResponse {
        data: StaffResponse::from(&staff),
    }))
}

/// POST /api/v1/staff
pub async fn create(
    RequireManager(actor): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateStaffRequest>,
) -> AppResult<impl IntoResponse> {
    let name = validate_name(&input.name, "name")?;
    let role = parse_role(&input.role)?;
    ensure_can_assign(&actor, role)?;
    validate_pin(&input.pin)?;
    let phone = normalize_phone(input.phone.as_deref())?;
    ensure_pin_unused(&state, &input.pin, None).await?;

    let create = CreateStaff {
        name,
        role: role.as_str().to_string(),
        pin_hash: hash(&input.pin)?,
        phone,
    };
    let staff = StaffRepo::create(&state.pool, &create).await?;

    tracing::info!(
        staff_id = staff.id,
        role = %staff.role,
        created_by = actor.staff_id,
        "Staff member created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StaffResponse::from(&staff),
        }),
    ))
}

/// PUT /api/v1/staff/{id}
///
/// Reactivating a staff member requires a new PIN: stored hashes are salted,
/// so the old PIN cannot be checked against the active staff.
pub async fn update(
    RequireManager(actor): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStaffRequest>,
) -> AppResult<impl IntoResponse> {
    let target = find_staff(&state, id).await?;
    ensure_can_manage(&actor, &target)?;

    let name = input
        .name
        .as_deref()
        .map(|n| validate_name(n, "name"))
        .transpose()?;
    let role = input.role.as_deref().map(parse_role).transpose()?;
    if let Some(role) = role {
        ensure_can_assign(&actor, role)?;
    }
    let phone = normalize_phone(input.phone.as_deref())?;

    match input.is_active {
        Some(false) => ensure_not_self(&actor, id)?,
        Some(true) if !target.is_active && input.pin.is_none() => {
            return Err(AppError::Core(CoreError::validation(
                "pin is required to reactivate a staff member",
            )));
        }
        _ => {}
    }

    let pin_hash = match input.pin.as_deref() {
        Some(pin) => {
            validate_pin(pin)?;
            ensure_pin_unused(&state, pin, Some(id)).await?;
            Some(hash(pin)?)
        }
        None => None,
    };

    let update = UpdateStaff {
        name,
        role: role.map(|r| r.as_str().to_string()),
        pin_hash,
        phone,
        is_active: input.is_active,
    };
    let staff = StaffRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Staff", id)))?;

    tracing::info!(staff_id = id, updated_by = actor.staff_id, "Staff member updated");
    Ok(Json(DataResponse {
        data: StaffResponse::from(&staff),
    }))
}

/// DELETE /api/v1/staff/{id}
///
/// Deactivates the record; sales and commissions keep referencing it.
pub async fn deactivate(
    RequireManager(actor): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_not_self(&actor, id)?;
    let target = find_staff(&state, id).await?;
    ensure_can_manage(&actor, &target)?;

    if StaffRepo::deactivate(&state.pool, id).await? {
        tracing::info!(staff_id = id, deactivated_by = actor.staff_id, "Staff member deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Staff", id)))
    }
}

/// GET /api/v1/staff/commissions?from=&to=&staff_id=
///
/// Commission earned per staff member over a period (default today).
/// Commissions of voided transactions are excluded.
pub async fn commission_report(
    RequireManager(_actor): RequireManager,
    State(state): State<AppState>,
    Query(params): Query<CommissionReportParams>,
) -> AppResult<impl IntoResponse> {
    let range = DateRangeParams {
        date: None,
        from: params.from,
        to: params.to,
    };
    let (start, end) = range.resolve()?;

    let rows = CommissionRepo::report_rows(&state.pool, start, end, params.staff_id).await?;
    let entries: Vec<CommissionEntry> = rows.into_iter().map(CommissionEntry::from).collect();
    let staff = summarize_commissions(&entries);

    Ok(Json(DataResponse {
        data: CommissionReport {
            period_start: start,
            period_end: end,
            total_commission: money::sum(staff.iter().map(|s| s.total_commission)),
            staff,
        },
    }))
}

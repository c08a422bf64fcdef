//! Handler for staff PIN login.
//!
//! Terminals are shared, so staff sign in with a short PIN rather than a
//! username and password. The PIN is checked against every active staff
//! member's hash; PINs are kept unique among active staff on create/update.

use axum::extract::State;
use axum::Json;
use salon_core::error::CoreError;
use salon_core::validation::validate_pin;
use salon_db::models::staff::StaffResponse;
use salon_db::repositories::StaffRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::issue_access_token;
use crate::auth::pin::find_by_pin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/pin-login`.
#[derive(Debug, Deserialize)]
pub struct PinLoginRequest {
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct PinLoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub staff: StaffResponse,
}

/// POST /api/v1/auth/pin-login
pub async fn pin_login(
    State(state): State<AppState>,
    Json(input): Json<PinLoginRequest>,
) -> AppResult<Json<DataResponse<PinLoginResponse>>> {
    validate_pin(&input.pin)?;

    let active = StaffRepo::list(&state.pool, false).await?;
    let staff = find_by_pin(&input.pin, &active).ok_or_else(|| {
        tracing::warn!("PIN login rejected");
        AppError::Core(CoreError::Unauthorized("Invalid PIN".into()))
    })?;

    let issued = issue_access_token(staff.id, &staff.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(staff_id = staff.id, role = %staff.role, "Staff signed in");

    Ok(Json(DataResponse {
        data: PinLoginResponse {
            access_token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            staff: StaffResponse::from(staff),
        },
    }))
}

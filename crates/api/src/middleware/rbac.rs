//! Role-based access control extractors.
//!
//! Wraps [`AuthStaff`] and rejects requests whose role is not high enough.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use salon_core::error::CoreError;
use salon_core::roles::is_manager_role;

use super::auth::AuthStaff;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `MANAGER` or `ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn manager_only(RequireManager(staff): RequireManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub AuthStaff);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let staff = AuthStaff::from_request_parts(parts, state).await?;
        if !is_manager_role(&staff.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required".into(),
            )));
        }
        Ok(RequireManager(staff))
    }
}

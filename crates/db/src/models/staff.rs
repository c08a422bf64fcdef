//! Staff entity model and DTOs.

use salon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full staff row from the `staff` table.
///
/// Contains the PIN hash -- NEVER serialize this to API responses directly.
/// Use [`StaffResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub pin_hash: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe staff representation for API responses (no PIN hash).
#[derive(Debug, Clone, Serialize)]
pub struct StaffResponse {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<&Staff> for StaffResponse {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id,
            name: staff.name.clone(),
            role: staff.role.clone(),
            phone: staff.phone.clone(),
            is_active: staff.is_active,
            created_at: staff.created_at,
        }
    }
}

/// DTO for creating a staff member. The PIN is already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateStaff {
    pub name: String,
    pub role: String,
    pub pin_hash: String,
    pub phone: Option<String>,
}

/// DTO for updating a staff member. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStaff {
    pub name: Option<String>,
    pub role: Option<String>,
    pub pin_hash: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

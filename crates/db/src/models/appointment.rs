//! Appointment entity model and DTOs.

use salon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub customer_id: Option<DbId>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub service_id: DbId,
    pub staff_id: Option<DbId>,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Appointment joined with its service and staff names, for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppointmentDetail {
    pub id: DbId,
    pub customer_id: Option<DbId>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub service_id: DbId,
    pub service_name: String,
    pub staff_id: Option<DbId>,
    pub staff_name: Option<String>,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting an appointment. Duration is resolved by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    pub customer_id: Option<DbId>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub service_id: DbId,
    pub staff_id: Option<DbId>,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// DTO for updating an appointment. All fields optional; status changes go
/// through [`crate::repositories::AppointmentRepo::update_status`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointment {
    pub customer_id: Option<DbId>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service_id: Option<DbId>,
    pub staff_id: Option<DbId>,
    pub scheduled_at: Option<Timestamp>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// Filters for listing appointments. `from` is inclusive, `to` exclusive.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub status: Option<String>,
    pub staff_id: Option<DbId>,
}

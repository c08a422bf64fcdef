//! Service catalog model and DTOs.

use salon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub cogs: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub cogs: Option<f64>,
    pub duration_minutes: Option<i32>,
}

/// DTO for updating a service. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cogs: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

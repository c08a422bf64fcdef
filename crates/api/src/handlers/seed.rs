//! First-run setup: the owner account and a starter service catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use salon_core::catalog::{
    CATEGORY_HAIR, CATEGORY_MAKEUP, CATEGORY_NAIL, CATEGORY_SKIN, CATEGORY_SPA,
};
use salon_core::error::CoreError;
use salon_core::roles::ROLE_ADMIN;
use salon_db::models::service::CreateService;
use salon_db::models::staff::{CreateStaff, StaffResponse};
use salon_db::repositories::{ServiceRepo, StaffRepo};
use serde::Serialize;

use crate::auth::pin::hash_pin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Starter catalog: (name, category, price, cogs, minutes).
const DEFAULT_SERVICES: &[(&str, &str, f64, f64, i32)] = &[
    ("Women's Haircut", CATEGORY_HAIR, 45.0, 2.0, 60),
    ("Men's Haircut", CATEGORY_HAIR, 25.0, 1.0, 30),
    ("Hair Coloring", CATEGORY_HAIR, 90.0, 18.0, 120),
    ("Blow Dry", CATEGORY_HAIR, 30.0, 1.5, 45),
    ("Manicure", CATEGORY_NAIL, 25.0, 3.0, 45),
    ("Pedicure", CATEGORY_NAIL, 35.0, 4.0, 60),
    ("Gel Nails", CATEGORY_NAIL, 40.0, 6.0, 75),
    ("Facial Treatment", CATEGORY_SKIN, 60.0, 8.0, 60),
    ("Body Massage", CATEGORY_SPA, 70.0, 5.0, 90),
    ("Event Makeup", CATEGORY_MAKEUP, 55.0, 7.0, 60),
];

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub admin: StaffResponse,
    pub services_created: usize,
}

/// POST /api/v1/seed
///
/// Creates the owner account from `SEED_ADMIN_NAME` / `SEED_ADMIN_PIN` and,
/// if the catalog is empty, the starter services. Refused with 409 once any
/// staff member exists. Runs in one transaction holding a lock on `staff`,
/// so concurrent seeds cannot both create an owner.
pub async fn seed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pin_hash = hash_pin(&state.config.seed.admin_pin)
        .map_err(|e| AppError::InternalError(format!("PIN hashing failed: {e}")))?;

    let mut tx = state.pool.begin().await?;
    StaffRepo::lock_table(&mut *tx).await?;
    if StaffRepo::count(&mut *tx).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Database is already seeded".into(),
        )));
    }

    let admin = StaffRepo::create(
        &mut *tx,
        &CreateStaff {
            name: state.config.seed.admin_name.clone(),
            role: ROLE_ADMIN.to_string(),
            pin_hash,
            phone: None,
        },
    )
    .await?;

    let mut services_created = 0;
    if ServiceRepo::count(&mut *tx).await? == 0 {
        for &(name, category, price, cogs, minutes) in DEFAULT_SERVICES {
            let input = CreateService {
                name: name.to_string(),
                category: category.to_string(),
                price,
                cogs: Some(cogs),
                duration_minutes: Some(minutes),
            };
            ServiceRepo::create(&mut *tx, &input).await?;
            services_created += 1;
        }
    }
    tx.commit().await?;

    tracing::info!(admin_id = admin.id, services_created, "Database seeded");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SeedResponse {
                admin: StaffResponse::from(&admin),
                services_created,
            },
        }),
    ))
}

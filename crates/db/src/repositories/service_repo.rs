//! Repository for the `services` table.

use salon_core::types::DbId;
use sqlx::{PgPool, Postgres};

use crate::models::service::{CreateService, Service, UpdateService};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, category, price, cogs, duration_minutes, is_active, created_at, updated_at";

/// Default appointment length for a service created without one.
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Provides CRUD operations for the service catalog.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateService) -> Result<Service, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO services (name, category, price, cogs, duration_minutes) \
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, $6)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.price)
            .bind(input.cogs)
            .bind(input.duration_minutes)
            .bind(DEFAULT_DURATION_MINUTES)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find several services at once. Missing ids are simply absent.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = ANY($1)");
        sqlx::query_as::<_, Service>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List services ordered by category then name.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
        category: Option<&str>,
    ) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services \
             WHERE ($1 OR is_active = true) \
               AND ($2::TEXT IS NULL OR category = $2) \
             ORDER BY category, name"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(include_inactive)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Update a service. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET \
                name = COALESCE($2, name), \
                category = COALESCE($3, category), \
                price = COALESCE($4, price), \
                cogs = COALESCE($5, cogs), \
                duration_minutes = COALESCE($6, duration_minutes), \
                is_active = COALESCE($7, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.price)
            .bind(input.cogs)
            .bind(input.duration_minutes)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a service (set is_active = false). Historical items keep
    /// referencing it.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE services SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

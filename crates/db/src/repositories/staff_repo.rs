//! Repository for the `staff` table.

use salon_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use salon_core::types::DbId;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::models::staff::{CreateStaff, Staff, UpdateStaff};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, role, pin_hash, phone, is_active, created_at, updated_at";

/// Provides CRUD operations for staff members.
pub struct StaffRepo;

impl StaffRepo {
    /// Insert a new staff member, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateStaff) -> Result<Staff, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO staff (name, role, pin_hash, phone) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.pin_hash)
            .bind(&input.phone)
            .fetch_one(executor)
            .await
    }

    /// Find a staff member by id (active or not).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find several staff members at once. Missing ids are simply absent.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = ANY($1)");
        sqlx::query_as::<_, Staff>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List staff ordered by name, optionally including deactivated members.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Staff>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM staff ORDER BY name, id")
        } else {
            format!("SELECT {COLUMNS} FROM staff WHERE is_active = true ORDER BY name, id")
        };
        sqlx::query_as::<_, Staff>(&query).fetch_all(pool).await
    }

    /// All active staff allowed to authorize voids (managers and admins).
    pub async fn list_active_managers(pool: &PgPool) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff \
             WHERE is_active = true AND role IN ($1, $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(ROLE_ADMIN)
            .bind(ROLE_MANAGER)
            .fetch_all(pool)
            .await
    }

    /// Update a staff member. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStaff,
    ) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!(
            "UPDATE staff SET \
                name = COALESCE($2, name), \
                role = COALESCE($3, role), \
                pin_hash = COALESCE($4, pin_hash), \
                phone = COALESCE($5, phone), \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.pin_hash)
            .bind(&input.phone)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a staff member. Returns `false` if already inactive or missing.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE staff SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of staff rows, active or not.
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Block other writers to `staff` until the surrounding transaction ends.
    pub async fn lock_table(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::query("LOCK TABLE staff IN SHARE ROW EXCLUSIVE MODE")
            .execute(conn)
            .await?;
        Ok(())
    }
}

//! Repository for the `appointments` table.

use salon_core::appointments::{STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_SCHEDULED};
use salon_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres};

use crate::models::appointment::{
    Appointment, AppointmentDetail, AppointmentFilter, CreateAppointment, UpdateAppointment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, customer_name, customer_phone, service_id, staff_id, \
    scheduled_at, duration_minutes, status, notes, created_at, updated_at";

/// Columns for [`AppointmentDetail`], joined with service and staff names.
const DETAIL_COLUMNS: &str = "a.id, a.customer_id, a.customer_name, a.customer_phone, \
    a.service_id, s.name AS service_name, a.staff_id, st.name AS staff_name, \
    a.scheduled_at, a.duration_minutes, a.status, a.notes, a.created_at";

const DETAIL_FROM: &str = "appointments a \
    JOIN services s ON s.id = a.service_id \
    LEFT JOIN staff st ON st.id = a.staff_id";

/// Provides CRUD and scheduling queries for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment in `SCHEDULED` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments \
                (customer_id, customer_name, customer_phone, service_id, staff_id, \
                 scheduled_at, duration_minutes, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(input.customer_id)
            .bind(&input.customer_name)
            .bind(&input.customer_phone)
            .bind(input.service_id)
            .bind(input.staff_id)
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AppointmentDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE a.id = $1");
        sqlx::query_as::<_, AppointmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List appointments matching the filter, ordered by start time.
    pub async fn list(
        pool: &PgPool,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} \
             WHERE ($1::TIMESTAMPTZ IS NULL OR a.scheduled_at >= $1) \
               AND ($2::TIMESTAMPTZ IS NULL OR a.scheduled_at < $2) \
               AND ($3::TEXT IS NULL OR a.status = $3) \
               AND ($4::BIGINT IS NULL OR a.staff_id = $4) \
             ORDER BY a.scheduled_at, a.id"
        );
        sqlx::query_as::<_, AppointmentDetail>(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.status)
            .bind(filter.staff_id)
            .fetch_all(pool)
            .await
    }

    /// Active appointments of `staff_id` overlapping `[start, end)`, excluding
    /// `exclude_id` (the appointment being rescheduled).
    pub async fn find_staff_conflicts(
        pool: &PgPool,
        staff_id: DbId,
        start: Timestamp,
        end: Timestamp,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments \
             WHERE staff_id = $1 \
               AND status IN ($2, $3) \
               AND scheduled_at < $5 \
               AND scheduled_at + make_interval(mins => duration_minutes) > $4 \
               AND ($6::BIGINT IS NULL OR id <> $6) \
             ORDER BY scheduled_at"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(staff_id)
            .bind(STATUS_SCHEDULED)
            .bind(STATUS_CONFIRMED)
            .bind(start)
            .bind(end)
            .bind(exclude_id)
            .fetch_all(pool)
            .await
    }

    /// Update an appointment. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET \
                customer_id = COALESCE($2, customer_id), \
                customer_name = COALESCE($3, customer_name), \
                customer_phone = COALESCE($4, customer_phone), \
                service_id = COALESCE($5, service_id), \
                staff_id = COALESCE($6, staff_id), \
                scheduled_at = COALESCE($7, scheduled_at), \
                duration_minutes = COALESCE($8, duration_minutes), \
                notes = COALESCE($9, notes) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(input.customer_id)
            .bind(&input.customer_name)
            .bind(&input.customer_phone)
            .bind(input.service_id)
            .bind(input.staff_id)
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Set the status of an appointment.
    ///
    /// Accepts any executor so checkout can complete the appointment inside
    /// its own database transaction.
    pub async fn update_status<'e, E>(
        executor: E,
        id: DbId,
        status: &str,
    ) -> Result<Option<Appointment>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await
    }

    /// Mark a SCHEDULED or CONFIRMED appointment COMPLETED.
    ///
    /// Returns `None` if the appointment is missing or already closed.
    pub async fn complete_open<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Appointment>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE appointments SET status = $2 \
             WHERE id = $1 AND status IN ($3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(STATUS_COMPLETED)
            .bind(STATUS_SCHEDULED)
            .bind(STATUS_CONFIRMED)
            .fetch_optional(executor)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

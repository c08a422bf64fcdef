//! Repository for the `commission_logs` table (read side).
//!
//! Logs are inserted only by [`crate::repositories::TransactionRepo::create_checkout`].

use salon_core::report::STATUS_VOID;
use salon_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::commission::{CommissionLog, CommissionReportRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, staff_id, transaction_id, transaction_item_id, amount, is_assist, reason, created_at";

pub struct CommissionRepo;

impl CommissionRepo {
    /// All commission logs written for one transaction.
    pub async fn list_for_transaction(
        pool: &PgPool,
        transaction_id: DbId,
    ) -> Result<Vec<CommissionLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM commission_logs WHERE transaction_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, CommissionLog>(&query)
            .bind(transaction_id)
            .fetch_all(pool)
            .await
    }

    /// Commission logs in `[from, to)` joined with staff, excluding logs
    /// whose transaction has been voided.
    pub async fn report_rows(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
        staff_id: Option<DbId>,
    ) -> Result<Vec<CommissionReportRow>, sqlx::Error> {
        sqlx::query_as::<_, CommissionReportRow>(
            "SELECT c.staff_id, s.name AS staff_name, s.role AS staff_role, \
                    c.amount, c.is_assist \
             FROM commission_logs c \
             JOIN staff s ON s.id = c.staff_id \
             JOIN transactions t ON t.id = c.transaction_id \
             WHERE c.created_at >= $1 AND c.created_at < $2 \
               AND t.status <> $3 \
               AND ($4::BIGINT IS NULL OR c.staff_id = $4) \
             ORDER BY c.id",
        )
        .bind(from)
        .bind(to)
        .bind(STATUS_VOID)
        .bind(staff_id)
        .fetch_all(pool)
        .await
    }
}

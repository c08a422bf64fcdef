//! Commission log model.

use salon_core::commission::CommissionEntry;
use salon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `commission_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommissionLog {
    pub id: DbId,
    pub staff_id: DbId,
    pub transaction_id: DbId,
    pub transaction_item_id: DbId,
    pub amount: f64,
    pub is_assist: bool,
    pub reason: String,
    pub created_at: Timestamp,
}

/// A commission log joined with its staff member, for reporting.
#[derive(Debug, Clone, FromRow)]
pub struct CommissionReportRow {
    pub staff_id: DbId,
    pub staff_name: String,
    pub staff_role: String,
    pub amount: f64,
    pub is_assist: bool,
}

impl From<CommissionReportRow> for CommissionEntry {
    fn from(row: CommissionReportRow) -> Self {
        Self {
            staff_id: row.staff_id,
            staff_name: row.staff_name,
            staff_role: row.staff_role,
            amount: row.amount,
            is_assist: row.is_assist,
        }
    }
}

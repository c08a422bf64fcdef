//! Transaction, transaction item and checkout DTOs.

use salon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::customer::Customer;

/// A row from the `transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub customer_id: Option<DbId>,
    pub appointment_id: Option<DbId>,
    pub total_amount: f64,
    pub payment_method: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub voided_at: Option<Timestamp>,
    pub voided_by: Option<DbId>,
    pub void_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `transaction_items` table, joined with staff names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransactionItem {
    pub id: DbId,
    pub transaction_id: DbId,
    pub service_id: DbId,
    pub service_name: String,
    pub category: String,
    pub price: f64,
    pub staff_id: DbId,
    pub staff_name: String,
    pub assistant_id: Option<DbId>,
    pub assistant_name: Option<String>,
}

/// A transaction together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithItems {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

/// A commission to be logged against a newly inserted item.
#[derive(Debug, Clone)]
pub struct NewCommission {
    pub staff_id: DbId,
    pub amount: f64,
    pub is_assist: bool,
    pub reason: String,
}

/// A fully resolved line item ready for insertion.
#[derive(Debug, Clone)]
pub struct NewTransactionItem {
    pub service_id: DbId,
    pub service_name: String,
    pub category: String,
    pub price: f64,
    pub staff_id: DbId,
    pub assistant_id: Option<DbId>,
    pub commissions: Vec<NewCommission>,
}

/// A fully resolved checkout. `total_amount` must equal the sum of item prices.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub customer_id: Option<DbId>,
    pub appointment_id: Option<DbId>,
    pub total_amount: f64,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub items: Vec<NewTransactionItem>,
}

/// Filters for listing transactions. `from` is inclusive, `to` exclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub status: Option<String>,
    pub customer_id: Option<DbId>,
}

/// Result of a checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The sale was written.
    Created(TransactionWithItems),
    /// The linked appointment is no longer SCHEDULED or CONFIRMED, usually
    /// because another checkout completed it first. Nothing was written.
    AppointmentNotOpen,
}

/// Result of a void attempt.
#[derive(Debug)]
pub enum VoidOutcome {
    /// No transaction with the given id.
    NotFound,
    /// The transaction was already voided; nothing changed.
    AlreadyVoid,
    /// Voided. Carries the updated transaction and, if one was linked, the
    /// customer with rolled-back statistics.
    Voided {
        transaction: Transaction,
        customer: Option<Customer>,
    },
}

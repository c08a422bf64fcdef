//! Repository for `transactions`, `transaction_items` and the commission
//! logs written at checkout.
//!
//! Checkout and void are the only multi-statement writes in the system; each
//! runs inside a single database transaction so the sale, its items, its
//! commissions and the customer's statistics commit together or not at all.

use salon_core::customer_stats::{apply_sale, rollback_sale, CustomerStats};
use salon_core::report::STATUS_VOID;
use salon_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::customer_repo::COLUMNS as CUSTOMER_COLUMNS;
use super::AppointmentRepo;
use crate::models::customer::Customer;
use crate::models::transaction::{
    CheckoutOutcome, NewTransaction, Transaction, TransactionFilter, TransactionItem,
    TransactionWithItems, VoidOutcome,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, appointment_id, total_amount, payment_method, status, \
    notes, created_by, voided_at, voided_by, void_reason, created_at, updated_at";

/// Item columns joined with performing and assisting staff names.
const ITEM_SELECT: &str = "SELECT i.id, i.transaction_id, i.service_id, i.service_name, \
    i.category, i.price, i.staff_id, s.name AS staff_name, i.assistant_id, \
    a.name AS assistant_name \
    FROM transaction_items i \
    JOIN staff s ON s.id = i.staff_id \
    LEFT JOIN staff a ON a.id = i.assistant_id";

/// Provides checkout, lookup and void operations for transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Record a sale atomically.
    ///
    /// Lock order: the customer row (statistics applied), then the linked
    /// appointment (completed only if still open), then the inserts of the
    /// transaction, its items and their commission logs. No insert runs
    /// before the rows it references are locked.
    pub async fn create_checkout(
        pool: &PgPool,
        input: &NewTransaction,
    ) -> Result<CheckoutOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(customer_id) = input.customer_id {
            update_customer_stats(&mut *tx, customer_id, true, |stats| {
                apply_sale(stats, input.total_amount)
            })
            .await?;
        }

        if let Some(appointment_id) = input.appointment_id {
            if AppointmentRepo::complete_open(&mut *tx, appointment_id)
                .await?
                .is_none()
            {
                tx.rollback().await?;
                return Ok(CheckoutOutcome::AppointmentNotOpen);
            }
        }

        let query = format!(
            "INSERT INTO transactions \
                (customer_id, appointment_id, total_amount, payment_method, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let transaction = sqlx::query_as::<_, Transaction>(&query)
            .bind(input.customer_id)
            .bind(input.appointment_id)
            .bind(input.total_amount)
            .bind(&input.payment_method)
            .bind(&input.notes)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.items {
            let (item_id,): (DbId,) = sqlx::query_as(
                "INSERT INTO transaction_items \
                    (transaction_id, service_id, service_name, category, price, staff_id, assistant_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id",
            )
            .bind(transaction.id)
            .bind(item.service_id)
            .bind(&item.service_name)
            .bind(&item.category)
            .bind(item.price)
            .bind(item.staff_id)
            .bind(item.assistant_id)
            .fetch_one(&mut *tx)
            .await?;

            for commission in &item.commissions {
                sqlx::query(
                    "INSERT INTO commission_logs \
                        (staff_id, transaction_id, transaction_item_id, amount, is_assist, reason) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(commission.staff_id)
                .bind(transaction.id)
                .bind(item_id)
                .bind(commission.amount)
                .bind(commission.is_assist)
                .bind(&commission.reason)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        let items = Self::list_items(pool, &[transaction.id]).await?;
        Ok(CheckoutOutcome::Created(TransactionWithItems { transaction, items }))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a transaction together with its items.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TransactionWithItems>, sqlx::Error> {
        let Some(transaction) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let items = Self::list_items(pool, &[id]).await?;
        Ok(Some(TransactionWithItems { transaction, items }))
    }

    /// List transactions newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions \
             WHERE ($1::TIMESTAMPTZ IS NULL OR created_at >= $1) \
               AND ($2::TIMESTAMPTZ IS NULL OR created_at < $2) \
               AND ($3::TEXT IS NULL OR status = $3) \
               AND ($4::BIGINT IS NULL OR customer_id = $4) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.status)
            .bind(filter.customer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Items belonging to any of the given transactions, grouped by
    /// transaction then insertion order.
    pub async fn list_items(
        pool: &PgPool,
        transaction_ids: &[DbId],
    ) -> Result<Vec<TransactionItem>, sqlx::Error> {
        let query =
            format!("{ITEM_SELECT} WHERE i.transaction_id = ANY($1) ORDER BY i.transaction_id, i.id");
        sqlx::query_as::<_, TransactionItem>(&query)
            .bind(transaction_ids)
            .fetch_all(pool)
            .await
    }

    /// Void a transaction and roll back the linked customer's statistics.
    ///
    /// The transaction row (and the customer row, if any) are locked for
    /// the duration so concurrent voids cannot double-apply the rollback.
    pub async fn void(
        pool: &PgPool,
        id: DbId,
        voided_by: DbId,
        reason: &str,
    ) -> Result<VoidOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let current = match current {
            None => return Ok(VoidOutcome::NotFound),
            Some(t) if t.status == STATUS_VOID => return Ok(VoidOutcome::AlreadyVoid),
            Some(t) => t,
        };

        let query = format!(
            "UPDATE transactions SET \
                status = $2, voided_at = NOW(), voided_by = $3, void_reason = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let transaction = sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(STATUS_VOID)
            .bind(voided_by)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        let customer = match current.customer_id {
            Some(customer_id) => {
                update_customer_stats(&mut *tx, customer_id, false, |stats| {
                    rollback_sale(stats, current.total_amount)
                })
                .await?
            }
            None => None,
        };

        tx.commit().await?;
        Ok(VoidOutcome::Voided {
            transaction,
            customer,
        })
    }
}

/// Lock a customer row, apply `change` to its statistics and write them back.
///
/// Returns `None` if the customer no longer exists. `touch_last_visit`
/// stamps `last_visit_at` with the current time.
async fn update_customer_stats<F>(
    conn: &mut PgConnection,
    customer_id: DbId,
    touch_last_visit: bool,
    change: F,
) -> Result<Option<Customer>, sqlx::Error>
where
    F: FnOnce(CustomerStats) -> CustomerStats,
{
    let row: Option<(i32, f64)> = sqlx::query_as(
        "SELECT total_visits, total_spend FROM customers WHERE id = $1 FOR UPDATE",
    )
    .bind(customer_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some((visits, spend)) = row else {
        return Ok(None);
    };
    let stats = change(CustomerStats::new(visits, spend));

    let query = format!(
        "UPDATE customers SET \
            total_visits = $2, total_spend = $3, average_ticket = $4, \
            last_visit_at = CASE WHEN $5 THEN NOW() ELSE last_visit_at END \
         WHERE id = $1 \
         RETURNING {CUSTOMER_COLUMNS}"
    );
    sqlx::query_as::<_, Customer>(&query)
        .bind(customer_id)
        .bind(stats.total_visits)
        .bind(stats.total_spend)
        .bind(stats.average_ticket)
        .bind(touch_last_visit)
        .fetch_optional(&mut *conn)
        .await
}

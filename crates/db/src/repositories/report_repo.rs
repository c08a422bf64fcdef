//! Loads transactions with nested items for report aggregation.

use std::collections::HashMap;

use salon_core::report::{ReportItem, ReportTransaction};
use salon_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::TransactionRepo;

pub struct ReportRepo;

impl ReportRepo {
    /// Every transaction created in `[from, to)`, voided ones included, with
    /// its items attached.
    pub async fn load_transactions(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<ReportTransaction>, sqlx::Error> {
        let headers: Vec<(DbId, f64, String, String)> = sqlx::query_as(
            "SELECT id, total_amount, payment_method, status \
             FROM transactions \
             WHERE created_at >= $1 AND created_at < $2 \
             ORDER BY created_at, id",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        let ids: Vec<DbId> = headers.iter().map(|h| h.0).collect();
        let mut items_by_tx: HashMap<DbId, Vec<ReportItem>> = HashMap::new();
        for item in TransactionRepo::list_items(pool, &ids).await? {
            items_by_tx
                .entry(item.transaction_id)
                .or_default()
                .push(ReportItem {
                    category: item.category,
                    price: item.price,
                    staff_id: item.staff_id,
                    staff_name: item.staff_name,
                });
        }

        Ok(headers
            .into_iter()
            .map(|(id, total_amount, payment_method, status)| ReportTransaction {
                total_amount,
                payment_method,
                status,
                items: items_by_tx.remove(&id).unwrap_or_default(),
            })
            .collect())
    }
}

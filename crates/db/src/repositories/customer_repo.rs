//! Repository for the `customers` table.

use salon_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, phone, email, notes, total_visits, total_spend, \
    average_ticket, last_visit_at, created_at, updated_at";

/// Provides CRUD operations for customers. Lifetime aggregates are written
/// only by [`crate::repositories::TransactionRepo`].
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer with zeroed aggregates.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (name, phone, email, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List customers by name, optionally filtered by a case-insensitive
    /// substring of name, phone or email.
    pub async fn search(
        pool: &PgPool,
        term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let pattern = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", escape_like(t)));
        let query = format!(
            "SELECT {COLUMNS} FROM customers \
             WHERE $1::TEXT IS NULL \
                OR name ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1 \
             ORDER BY name, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update contact fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                email = COALESCE($4, email), \
                notes = COALESCE($5, notes) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a customer. Fails with a foreign-key violation if the customer
    /// has transactions.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

//! Customer entity model and DTOs.

use salon_core::customer_stats::CustomerStats;
use salon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `customers` table, including lifetime aggregates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub total_visits: i32,
    pub total_spend: f64,
    pub average_ticket: f64,
    pub last_visit_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Customer {
    pub fn stats(&self) -> CustomerStats {
        CustomerStats {
            total_visits: self.total_visits,
            total_spend: self.total_spend,
            average_ticket: self.average_ticket,
        }
    }
}

/// DTO for creating a customer. Aggregates always start at zero.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating contact fields. Aggregates are maintained by checkout
/// and void only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

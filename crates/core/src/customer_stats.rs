//! Customer lifetime statistics.
//!
//! A sale adds one visit and its total to the customer's lifetime spend; a
//! void takes them back out. Both recompute the average ticket from the new
//! totals rather than adjusting it incrementally.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{to_decimal, to_f64};

/// The aggregate columns kept on a customer row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total_visits: i32,
    pub total_spend: f64,
    pub average_ticket: f64,
}

impl CustomerStats {
    pub const EMPTY: Self = Self {
        total_visits: 0,
        total_spend: 0.0,
        average_ticket: 0.0,
    };

    pub fn new(total_visits: i32, total_spend: f64) -> Self {
        Self {
            total_visits,
            total_spend,
            average_ticket: average_ticket(total_spend, total_visits),
        }
    }
}

/// Lifetime spend divided by visits; 0 when there are no visits.
pub fn average_ticket(total_spend: f64, total_visits: i32) -> f64 {
    if total_visits <= 0 {
        return 0.0;
    }
    to_f64(to_decimal(total_spend) / Decimal::from(total_visits))
}

/// Record a completed sale of `amount`.
pub fn apply_sale(stats: CustomerStats, amount: f64) -> CustomerStats {
    let visits = stats.total_visits.saturating_add(1);
    let spend = to_f64(to_decimal(stats.total_spend) + to_decimal(amount));
    CustomerStats::new(visits, spend)
}

/// Reverse a sale of `amount`. Visits and spend are floored at zero.
pub fn rollback_sale(stats: CustomerStats, amount: f64) -> CustomerStats {
    let visits = (stats.total_visits - 1).max(0);
    let spend = (to_decimal(stats.total_spend) - to_decimal(amount)).max(Decimal::ZERO);
    CustomerStats::new(visits, to_f64(spend))
}

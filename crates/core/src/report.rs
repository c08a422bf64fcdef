//! Sales report aggregation.
//!
//! Folds a set of transactions (with their items) into totals grouped by
//! payment method, service category and performing staff member. All sums
//! are accumulated as [`Decimal`] and rounded once at the end, so the
//! per-group amounts always add up to `total_sales`.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{to_decimal, to_f64};
use crate::types::DbId;

/// Transaction status for a completed sale.
pub const STATUS_COMPLETED: &str = "COMPLETED";
/// Transaction status after a void.
pub const STATUS_VOID: &str = "VOID";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A transaction as loaded for reporting.
#[derive(Debug, Clone)]
pub struct ReportTransaction {
    pub total_amount: f64,
    pub payment_method: String,
    pub status: String,
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Clone)]
pub struct ReportItem {
    pub category: String,
    pub price: f64,
    pub staff_id: DbId,
    pub staff_name: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Amount and number of contributing rows for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTotal {
    pub amount: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffSales {
    pub staff_id: DbId,
    pub staff_name: String,
    pub amount: f64,
    pub service_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesReport {
    pub total_sales: f64,
    pub transaction_count: u32,
    pub average_ticket: f64,
    pub service_count: u32,
    pub voided_count: u32,
    pub voided_amount: f64,
    pub by_payment_method: BTreeMap<String, GroupTotal>,
    pub by_category: BTreeMap<String, GroupTotal>,
    pub by_staff: Vec<StaffSales>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Acc {
    amount: Decimal,
    count: u32,
}

impl Acc {
    fn add(&mut self, amount: Decimal) {
        self.amount += amount;
        self.count += 1;
    }

    fn finish(&self) -> GroupTotal {
        GroupTotal {
            amount: to_f64(self.amount),
            count: self.count,
        }
    }
}

/// Aggregate transactions into a [`SalesReport`].
///
/// Voided transactions contribute only to `voided_count` / `voided_amount`.
/// Category and staff totals are built from item prices; a completed
/// transaction's total equals the sum of its items, so they reconcile with
/// `total_sales`.
pub fn aggregate_sales(transactions: &[ReportTransaction]) -> SalesReport {
    let mut total = Decimal::ZERO;
    let mut voided = Decimal::ZERO;
    let mut transaction_count = 0u32;
    let mut voided_count = 0u32;
    let mut service_count = 0u32;
    let mut by_method: BTreeMap<String, Acc> = BTreeMap::new();
    let mut by_category: BTreeMap<String, Acc> = BTreeMap::new();
    let mut by_staff: HashMap<DbId, (String, Acc)> = HashMap::new();

    for tx in transactions {
        let amount = to_decimal(tx.total_amount);
        if tx.status == STATUS_VOID {
            voided += amount;
            voided_count += 1;
            continue;
        }

        total += amount;
        transaction_count += 1;
        by_method
            .entry(tx.payment_method.clone())
            .or_default()
            .add(amount);

        for item in &tx.items {
            let price = to_decimal(item.price);
            service_count += 1;
            by_category
                .entry(item.category.clone())
                .or_default()
                .add(price);
            by_staff
                .entry(item.staff_id)
                .or_insert_with(|| (item.staff_name.clone(), Acc::default()))
                .1
                .add(price);
        }
    }

    let average_ticket = if transaction_count == 0 {
        0.0
    } else {
        to_f64(total / Decimal::from(transaction_count))
    };

    let mut staff: Vec<StaffSales> = by_staff
        .into_iter()
        .map(|(staff_id, (staff_name, acc))| StaffSales {
            staff_id,
            staff_name,
            amount: to_f64(acc.amount),
            service_count: acc.count,
        })
        .collect();
    staff.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.staff_id.cmp(&b.staff_id))
    });

    SalesReport {
        total_sales: to_f64(total),
        transaction_count,
        average_ticket,
        service_count,
        voided_count,
        voided_amount: to_f64(voided),
        by_payment_method: by_method.iter().map(|(k, v)| (k.clone(), v.finish())).collect(),
        by_category: by_category.iter().map(|(k, v)| (k.clone(), v.finish())).collect(),
        by_staff: staff,
    }
}

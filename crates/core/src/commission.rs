//! Commission rule and commission report aggregation.
//!
//! Commission is computed once per transaction item and per eligible staff
//! member when the sale is recorded. Stored logs are never recomputed.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::CATEGORY_HAIR;
use crate::money::{percent_of, to_decimal, to_f64};
use crate::roles::StaffRole;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Stylist rate on HAIR services.
pub const STYLIST_HAIR_RATE_PERCENT: u32 = 10;
/// Assistant rate when performing a service alone.
pub const ASSISTANT_SOLO_RATE_PERCENT: u32 = 10;
/// Assistant rate when assisting another staff member.
pub const ASSISTANT_ASSIST_RATE_PERCENT: u32 = 5;

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// Commission percentage for a role on a service category.
///
/// Stylists earn only on HAIR. Assistants earn on every category, at the
/// lower rate when assisting. All other roles, and an unknown role, earn
/// nothing.
pub fn commission_rate(category: &str, role: Option<StaffRole>, is_assistant: bool) -> u32 {
    match role {
        Some(StaffRole::Stylist) => {
            if category.trim().eq_ignore_ascii_case(CATEGORY_HAIR) {
                STYLIST_HAIR_RATE_PERCENT
            } else {
                0
            }
        }
        Some(StaffRole::Assistant) => {
            if is_assistant {
                ASSISTANT_ASSIST_RATE_PERCENT
            } else {
                ASSISTANT_SOLO_RATE_PERCENT
            }
        }
        _ => 0,
    }
}

/// Commission owed on a single item, rounded to cents.
pub fn calculate_commission(
    price: f64,
    category: &str,
    role: Option<StaffRole>,
    is_assistant: bool,
) -> f64 {
    match commission_rate(category, role, is_assistant) {
        0 => 0.0,
        rate => percent_of(price, rate),
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One commission log joined with its staff member, as read for a report.
#[derive(Debug, Clone)]
pub struct CommissionEntry {
    pub staff_id: DbId,
    pub staff_name: String,
    pub staff_role: String,
    pub amount: f64,
    pub is_assist: bool,
}

/// Per-staff commission totals over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffCommissionSummary {
    pub staff_id: DbId,
    pub staff_name: String,
    pub role: String,
    pub total_commission: f64,
    pub item_count: u32,
    pub assist_count: u32,
}

/// Group commission entries by staff member.
///
/// Sorted by total commission descending, then by name.
pub fn summarize_commissions(entries: &[CommissionEntry]) -> Vec<StaffCommissionSummary> {
    struct Acc<'a> {
        name: &'a str,
        role: &'a str,
        total: Decimal,
        items: u32,
        assists: u32,
    }

    let mut by_staff: HashMap<DbId, Acc<'_>> = HashMap::new();
    for entry in entries {
        let acc = by_staff.entry(entry.staff_id).or_insert_with(|| Acc {
            name: &entry.staff_name,
            role: &entry.staff_role,
            total: Decimal::ZERO,
            items: 0,
            assists: 0,
        });
        acc.total += to_decimal(entry.amount);
        if entry.is_assist {
            acc.assists += 1;
        } else {
            acc.items += 1;
        }
    }

    let mut summaries: Vec<StaffCommissionSummary> = by_staff
        .into_iter()
        .map(|(staff_id, acc)| StaffCommissionSummary {
            staff_id,
            staff_name: acc.name.to_string(),
            role: acc.role.to_string(),
            total_commission: to_f64(acc.total),
            item_count: acc.items,
            assist_count: acc.assists,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_commission
            .total_cmp(&a.total_commission)
            .then_with(|| a.staff_name.cmp(&b.staff_name))
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SERVICE_CATEGORIES;

    // -- calculate_commission --

    #[test]
    fn stylist_earns_ten_percent_on_hair() {
        assert_eq!(
            calculate_commission(200.0, "HAIR", Some(StaffRole::Stylist), false),
            20.0
        );
    }

    #[test]
    fn stylist_rule_ignores_assistant_flag() {
        assert_eq!(
            calculate_commission(200.0, "HAIR", Some(StaffRole::Stylist), true),
            20.0
        );
        assert_eq!(
            calculate_commission(200.0, "NAIL", Some(StaffRole::Stylist), true),
            0.0
        );
    }

    #[test]
    fn stylist_earns_nothing_outside_hair() {
        for category in SERVICE_CATEGORIES.iter().filter(|c| **c != "HAIR") {
            assert_eq!(
                calculate_commission(150.0, category, Some(StaffRole::Stylist), false),
                0.0,
                "category {category}"
            );
        }
    }

    #[test]
    fn hair_category_match_is_case_insensitive() {
        assert_eq!(
            calculate_commission(80.0, "hair", Some(StaffRole::Stylist), false),
            8.0
        );
    }

    #[test]
    fn assistant_rates_apply_to_every_category() {
        for category in SERVICE_CATEGORIES {
            assert_eq!(
                calculate_commission(100.0, category, Some(StaffRole::Assistant), false),
                10.0,
                "solo on {category}"
            );
            assert_eq!(
                calculate_commission(100.0, category, Some(StaffRole::Assistant), true),
                5.0,
                "assisting on {category}"
            );
        }
    }

    #[test]
    fn other_roles_earn_nothing() {
        for role in [
            Some(StaffRole::Admin),
            Some(StaffRole::Manager),
            Some(StaffRole::Receptionist),
            None,
        ] {
            for category in SERVICE_CATEGORIES {
                for is_assistant in [false, true] {
                    assert_eq!(
                        calculate_commission(100.0, category, role, is_assistant),
                        0.0,
                        "{role:?} on {category}, assisting={is_assistant}"
                    );
                }
            }
        }
    }

    #[test]
    fn commission_is_rounded_to_cents() {
        assert_eq!(
            calculate_commission(33.33, "SPA", Some(StaffRole::Assistant), true),
            1.67
        );
    }

    // -- summarize_commissions --

    fn entry(staff_id: DbId, name: &str, amount: f64, is_assist: bool) -> CommissionEntry {
        CommissionEntry {
            staff_id,
            staff_name: name.to_string(),
            staff_role: "STYLIST".to_string(),
            amount,
            is_assist,
        }
    }

    #[test]
    fn summaries_group_by_staff_and_sort_by_total() {
        let entries = vec![
            entry(1, "Ana", 10.0, false),
            entry(2, "Ben", 5.5, true),
            entry(1, "Ana", 2.5, false),
            entry(2, "Ben", 20.0, false),
        ];
        let summaries = summarize_commissions(&entries);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].staff_id, 2);
        assert_eq!(summaries[0].total_commission, 25.5);
        assert_eq!(summaries[0].item_count, 1);
        assert_eq!(summaries[0].assist_count, 1);
        assert_eq!(summaries[1].staff_id, 1);
        assert_eq!(summaries[1].total_commission, 12.5);
        assert_eq!(summaries[1].item_count, 2);
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let entries = vec![entry(7, "Zoe", 4.0, false), entry(3, "Amy", 4.0, false)];
        let summaries = summarize_commissions(&entries);
        assert_eq!(summaries[0].staff_name, "Amy");
        assert_eq!(summaries[1].staff_name, "Zoe");
    }

    #[test]
    fn empty_input_gives_empty_report() {
        assert!(summarize_commissions(&[]).is_empty());
    }
}

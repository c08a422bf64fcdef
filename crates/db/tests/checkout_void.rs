//! Integration tests for checkout, void-and-rollback, and the report and
//! commission queries built on top of them.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use salon_core::commission::{summarize_commissions, CommissionEntry};
use salon_core::report::aggregate_sales;
use salon_db::models::appointment::CreateAppointment;
use salon_db::models::customer::CreateCustomer;
use salon_db::models::service::CreateService;
use salon_db::models::staff::CreateStaff;
use salon_db::models::transaction::{
    CheckoutOutcome, NewCommission, NewTransaction, NewTransactionItem, TransactionFilter,
    TransactionWithItems, VoidOutcome,
};
use salon_db::repositories::{
    AppointmentRepo, CommissionRepo, CustomerRepo, ReportRepo, ServiceRepo, StaffRepo,
    TransactionRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Fixture {
    manager_id: i64,
    stylist_id: i64,
    assistant_id: i64,
    customer_id: i64,
    cut_id: i64,
    nails_id: i64,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let staff = |name: &str, role: &str| CreateStaff {
        name: name.to_string(),
        role: role.to_string(),
        pin_hash: "$argon2id$placeholder".to_string(),
        phone: None,
    };
    let service = |name: &str, category: &str, price: f64| CreateService {
        name: name.to_string(),
        category: category.to_string(),
        price,
        cogs: None,
        duration_minutes: None,
    };

    let manager = StaffRepo::create(pool, &staff("Hoa", "MANAGER")).await.unwrap();
    let stylist = StaffRepo::create(pool, &staff("Linh", "STYLIST")).await.unwrap();
    let assistant = StaffRepo::create(pool, &staff("Tam", "ASSISTANT")).await.unwrap();
    let customer = CustomerRepo::create(
        pool,
        &CreateCustomer {
            name: "Mai".into(),
            phone: None,
            email: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    let cut = ServiceRepo::create(pool, &service("Cut", "HAIR", 50.0)).await.unwrap();
    let nails = ServiceRepo::create(pool, &service("Manicure", "NAIL", 30.0)).await.unwrap();

    Fixture {
        manager_id: manager.id,
        stylist_id: stylist.id,
        assistant_id: assistant.id,
        customer_id: customer.id,
        cut_id: cut.id,
        nails_id: nails.id,
    }
}

/// A two-item sale: a haircut by the stylist with the assistant helping,
/// and a manicure by the assistant alone.
fn sale(f: &Fixture, customer_id: Option<i64>) -> NewTransaction {
    NewTransaction {
        customer_id,
        appointment_id: None,
        total_amount: 80.0,
        payment_method: "CARD".into(),
        notes: None,
        created_by: Some(f.manager_id),
        items: vec![
            NewTransactionItem {
                service_id: f.cut_id,
                service_name: "Cut".into(),
                category: "HAIR".into(),
                price: 50.0,
                staff_id: f.stylist_id,
                assistant_id: Some(f.assistant_id),
                commissions: vec![
                    NewCommission {
                        staff_id: f.stylist_id,
                        amount: 5.0,
                        is_assist: false,
                        reason: "10% for performing Cut".into(),
                    },
                    NewCommission {
                        staff_id: f.assistant_id,
                        amount: 2.5,
                        is_assist: true,
                        reason: "5% for assisting Cut".into(),
                    },
                ],
            },
            NewTransactionItem {
                service_id: f.nails_id,
                service_name: "Manicure".into(),
                category: "NAIL".into(),
                price: 30.0,
                staff_id: f.assistant_id,
                assistant_id: None,
                commissions: vec![NewCommission {
                    staff_id: f.assistant_id,
                    amount: 3.0,
                    is_assist: false,
                    reason: "10% for performing Manicure".into(),
                }],
            },
        ],
    }
}

async fn checkout(pool: &PgPool, input: &NewTransaction) -> TransactionWithItems {
    let outcome = TransactionRepo::create_checkout(pool, input).await.unwrap();
    assert_matches!(outcome, CheckoutOutcome::Created(created) => created)
}

fn today() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let now = Utc::now();
    (now - Duration::hours(1), now + Duration::hours(1))
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_writes_items_commissions_and_customer_stats(pool: PgPool) {
    let f = fixture(&pool).await;
    let created = checkout(&pool, &sale(&f, Some(f.customer_id))).await;

    assert_eq!(created.transaction.status, "COMPLETED");
    assert_eq!(created.transaction.total_amount, 80.0);
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].staff_name, "Linh");
    assert_eq!(created.items[0].assistant_name.as_deref(), Some("Tam"));

    let logs = CommissionRepo::list_for_transaction(&pool, created.transaction.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 3);
    assert!(logs.iter().all(|l| l.transaction_id == created.transaction.id));

    let customer = CustomerRepo::find_by_id(&pool, f.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.total_visits, 1);
    assert_eq!(customer.total_spend, 80.0);
    assert_eq!(customer.average_ticket, 80.0);
    assert!(customer.last_visit_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_completes_linked_appointment(pool: PgPool) {
    let f = fixture(&pool).await;
    let appointment = AppointmentRepo::create(
        &pool,
        &CreateAppointment {
            customer_id: Some(f.customer_id),
            customer_name: "Mai".into(),
            customer_phone: None,
            service_id: f.cut_id,
            staff_id: Some(f.stylist_id),
            scheduled_at: Utc::now(),
            duration_minutes: 60,
            notes: None,
        },
    )
    .await
    .unwrap();

    let mut input = sale(&f, Some(f.customer_id));
    input.appointment_id = Some(appointment.id);
    checkout(&pool, &input).await;

    let after = AppointmentRepo::find_by_id(&pool, appointment.id).await.unwrap().unwrap();
    assert_eq!(after.status, "COMPLETED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_closed_appointment_cannot_be_checked_out_again(pool: PgPool) {
    let f = fixture(&pool).await;
    let appointment = AppointmentRepo::create(
        &pool,
        &CreateAppointment {
            customer_id: Some(f.customer_id),
            customer_name: "Mai".into(),
            customer_phone: None,
            service_id: f.cut_id,
            staff_id: Some(f.stylist_id),
            scheduled_at: Utc::now(),
            duration_minutes: 60,
            notes: None,
        },
    )
    .await
    .unwrap();

    let mut input = sale(&f, Some(f.customer_id));
    input.appointment_id = Some(appointment.id);
    checkout(&pool, &input).await;

    let outcome = TransactionRepo::create_checkout(&pool, &input).await.unwrap();
    assert_matches!(outcome, CheckoutOutcome::AppointmentNotOpen);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
    let customer = CustomerRepo::find_by_id(&pool, f.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.total_visits, 1);
    assert_eq!(customer.total_spend, 80.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_checkouts_for_one_customer_both_commit(pool: PgPool) {
    let f = fixture(&pool).await;
    let input = sale(&f, Some(f.customer_id));

    let (a, b) = tokio::join!(
        TransactionRepo::create_checkout(&pool, &input),
        TransactionRepo::create_checkout(&pool, &input),
    );
    assert_matches!(a.unwrap(), CheckoutOutcome::Created(_));
    assert_matches!(b.unwrap(), CheckoutOutcome::Created(_));

    let customer = CustomerRepo::find_by_id(&pool, f.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.total_visits, 2);
    assert_eq!(customer.total_spend, 160.0);
    assert_eq!(customer.average_ticket, 80.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_checkout_leaves_nothing_behind(pool: PgPool) {
    let f = fixture(&pool).await;
    let mut input = sale(&f, Some(f.customer_id));
    // Zero-amount commissions violate ck_commission_logs_amount.
    input.items[1].commissions[0].amount = 0.0;

    let err = TransactionRepo::create_checkout(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
    let customer = CustomerRepo::find_by_id(&pool, f.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.total_visits, 0);
    assert_eq!(customer.total_spend, 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_with_transactions_cannot_be_deleted(pool: PgPool) {
    let f = fixture(&pool).await;
    checkout(&pool, &sale(&f, Some(f.customer_id))).await;

    let err = CustomerRepo::delete(&pool, f.customer_id).await.unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("fk_transactions_customer")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_customer_and_status(pool: PgPool) {
    let f = fixture(&pool).await;
    let first = checkout(&pool, &sale(&f, Some(f.customer_id))).await;
    checkout(&pool, &sale(&f, None)).await;
    TransactionRepo::void(&pool, first.transaction.id, f.manager_id, "refund")
        .await
        .unwrap();

    let for_customer = TransactionRepo::list(
        &pool,
        &TransactionFilter {
            customer_id: Some(f.customer_id),
            ..TransactionFilter::default()
        },
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(for_customer.len(), 1);

    let completed = TransactionRepo::list(
        &pool,
        &TransactionFilter {
            status: Some("COMPLETED".into()),
            ..TransactionFilter::default()
        },
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(completed.len(), 1);
    assert!(completed[0].customer_id.is_none());
}

// ---------------------------------------------------------------------------
// Void
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_void_rolls_back_customer_stats(pool: PgPool) {
    let f = fixture(&pool).await;
    let first = checkout(&pool, &sale(&f, Some(f.customer_id))).await;
    let mut smaller = sale(&f, Some(f.customer_id));
    smaller.items.truncate(1);
    smaller.total_amount = 50.0;
    checkout(&pool, &smaller).await;

    let outcome = TransactionRepo::void(&pool, first.transaction.id, f.manager_id, "wrong card")
        .await
        .unwrap();
    let (transaction, customer) = match outcome {
        VoidOutcome::Voided {
            transaction,
            customer,
        } => (transaction, customer.unwrap()),
        other => panic!("expected Voided, got {other:?}"),
    };

    assert_eq!(transaction.status, "VOID");
    assert_eq!(transaction.voided_by, Some(f.manager_id));
    assert_eq!(transaction.void_reason.as_deref(), Some("wrong card"));
    assert!(transaction.voided_at.is_some());

    assert_eq!(customer.total_visits, 1);
    assert_eq!(customer.total_spend, 50.0);
    assert_eq!(customer.average_ticket, 50.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_void_twice_is_rejected_without_double_rollback(pool: PgPool) {
    let f = fixture(&pool).await;
    let created = checkout(&pool, &sale(&f, Some(f.customer_id))).await;
    let id = created.transaction.id;

    assert_matches!(
        TransactionRepo::void(&pool, id, f.manager_id, "first").await.unwrap(),
        VoidOutcome::Voided { .. }
    );
    assert_matches!(
        TransactionRepo::void(&pool, id, f.manager_id, "second").await.unwrap(),
        VoidOutcome::AlreadyVoid
    );

    let customer = CustomerRepo::find_by_id(&pool, f.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.total_visits, 0);
    assert_eq!(customer.total_spend, 0.0);
    assert_eq!(customer.average_ticket, 0.0);

    let after = TransactionRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(after.void_reason.as_deref(), Some("first"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_void_missing_transaction(pool: PgPool) {
    let f = fixture(&pool).await;
    assert_matches!(
        TransactionRepo::void(&pool, 999_999, f.manager_id, "x").await.unwrap(),
        VoidOutcome::NotFound
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_void_floors_stats_at_zero(pool: PgPool) {
    let f = fixture(&pool).await;
    let created = checkout(&pool, &sale(&f, Some(f.customer_id))).await;
    // Simulate stats that were reset by hand after the sale.
    sqlx::query("UPDATE customers SET total_visits = 0, total_spend = 10 WHERE id = $1")
        .bind(f.customer_id)
        .execute(&pool)
        .await
        .unwrap();

    TransactionRepo::void(&pool, created.transaction.id, f.manager_id, "reset")
        .await
        .unwrap();
    let customer = CustomerRepo::find_by_id(&pool, f.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.total_visits, 0);
    assert_eq!(customer.total_spend, 0.0);
    assert_eq!(customer.average_ticket, 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_void_without_customer(pool: PgPool) {
    let f = fixture(&pool).await;
    let created = checkout(&pool, &sale(&f, None)).await;
    let outcome = TransactionRepo::void(&pool, created.transaction.id, f.manager_id, "test")
        .await
        .unwrap();
    assert_matches!(outcome, VoidOutcome::Voided { customer: None, .. });
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_excludes_voided_sales(pool: PgPool) {
    let f = fixture(&pool).await;
    let voided = checkout(&pool, &sale(&f, Some(f.customer_id))).await;
    let mut cash = sale(&f, None);
    cash.payment_method = "CASH".into();
    checkout(&pool, &cash).await;
    TransactionRepo::void(&pool, voided.transaction.id, f.manager_id, "dup")
        .await
        .unwrap();

    let (from, to) = today();
    let rows = ReportRepo::load_transactions(&pool, from, to).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|t| t.items.len() == 2));

    let report = aggregate_sales(&rows);
    assert_eq!(report.total_sales, 80.0);
    assert_eq!(report.transaction_count, 1);
    assert_eq!(report.voided_count, 1);
    assert_eq!(report.voided_amount, 80.0);
    assert_eq!(report.by_payment_method["CASH"].amount, 80.0);
    assert!(!report.by_payment_method.contains_key("CARD"));
    assert_eq!(report.by_category["HAIR"].amount, 50.0);
    assert_eq!(report.by_category["NAIL"].amount, 30.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_commission_report_excludes_voided_sales(pool: PgPool) {
    let f = fixture(&pool).await;
    let voided = checkout(&pool, &sale(&f, None)).await;
    checkout(&pool, &sale(&f, None)).await;
    TransactionRepo::void(&pool, voided.transaction.id, f.manager_id, "dup")
        .await
        .unwrap();

    let (from, to) = today();
    let rows = CommissionRepo::report_rows(&pool, from, to, None).await.unwrap();
    assert_eq!(rows.len(), 3);

    let entries: Vec<CommissionEntry> = rows.into_iter().map(CommissionEntry::from).collect();
    let summary = summarize_commissions(&entries);
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].staff_id, f.assistant_id);
    assert_eq!(summary[0].total_commission, 5.5);
    assert_eq!(summary[0].item_count, 1);
    assert_eq!(summary[0].assist_count, 1);
    assert_eq!(summary[1].staff_id, f.stylist_id);
    assert_eq!(summary[1].total_commission, 5.0);

    let stylist_only = CommissionRepo::report_rows(&pool, from, to, Some(f.stylist_id))
        .await
        .unwrap();
    assert_eq!(stylist_only.len(), 1);
}

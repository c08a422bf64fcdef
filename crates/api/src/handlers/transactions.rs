//! Handlers for the `/transactions` resource: checkout, history and void.
//!
//! Checkout resolves every line item against the catalog and staff records,
//! prices it, computes its commissions and hands the fully resolved sale to
//! [`TransactionRepo::create_checkout`], which writes it atomically. Clients
//! never supply the total.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use salon_core::appointments::{validate_transition, STATUS_COMPLETED as APPOINTMENT_COMPLETED};
use salon_core::catalog::normalize_payment_method;
use salon_core::commission::{calculate_commission, commission_rate};
use salon_core::error::CoreError;
use salon_core::money;
use salon_core::report::{STATUS_COMPLETED, STATUS_VOID};
use salon_core::roles::StaffRole;
use salon_core::types::DbId;
use salon_core::validation::{validate_amount, validate_notes, validate_pin};
use salon_db::models::customer::Customer;
use salon_db::models::service::Service;
use salon_db::models::staff::Staff;
use salon_db::models::transaction::{
    CheckoutOutcome, NewCommission, NewTransaction, NewTransactionItem, Transaction,
    TransactionFilter, VoidOutcome,
};
use salon_db::repositories::{
    AppointmentRepo, CustomerRepo, ServiceRepo, StaffRepo, TransactionRepo,
};
use salon_db::{clamp_limit, clamp_offset};
use serde::{Deserialize, Serialize};

use crate::auth::pin::find_by_pin;
use crate::error::{AppError, AppResult};
use crate::query::DateRangeParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;
/// Upper bound on line items in one sale.
const MAX_ITEMS: usize = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /transactions`. Without `from`/`to` the
/// listing is not date-bounded.
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
    pub customer_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /transactions`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: Option<DbId>,
    pub appointment_id: Option<DbId>,
    pub payment_method: String,
    pub notes: Option<String>,
    /// Staff member operating the register.
    pub created_by: Option<DbId>,
    pub items: Vec<CheckoutItem>,
}

/// One line of a checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub service_id: DbId,
    /// Staff member who performed the service.
    pub staff_id: DbId,
    pub assistant_id: Option<DbId>,
    /// Overrides the catalog price (discounts, custom work).
    pub price: Option<f64>,
}

/// Request body for `POST /transactions/{id}/void`.
#[derive(Debug, Deserialize)]
pub struct VoidRequest {
    /// PIN of the manager or admin authorizing the void.
    pub pin: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct VoidResponse {
    pub transaction: Transaction,
    /// The linked customer after rollback, if any.
    pub customer: Option<Customer>,
}

// ---------------------------------------------------------------------------
// Checkout resolution
// ---------------------------------------------------------------------------

/// Resolve request lines into priced items with their commissions.
///
/// `services` and `staff` must contain every id referenced by `items`;
/// missing ids are reported as not found.
fn resolve_items(
    items: &[CheckoutItem],
    services: &HashMap<DbId, Service>,
    staff: &HashMap<DbId, Staff>,
) -> Result<Vec<NewTransactionItem>, CoreError> {
    if items.is_empty() {
        return Err(CoreError::validation("items must not be empty"));
    }
    if items.len() > MAX_ITEMS {
        return Err(CoreError::Validation(format!(
            "a sale may have at most {MAX_ITEMS} items, got {}",
            items.len()
        )));
    }

    items
        .iter()
        .map(|item| {
            let service = services
                .get(&item.service_id)
                .ok_or(CoreError::not_found("Service", item.service_id))?;
            if !service.is_active {
                return Err(CoreError::Validation(format!(
                    "Service '{}' is no longer offered",
                    service.name
                )));
            }

            let price = money::round_money(item.price.unwrap_or(service.price));
            validate_amount(price, "price")?;

            let performer = active_staff(staff, item.staff_id)?;
            let mut commissions = Vec::with_capacity(2);
            push_commission(&mut commissions, performer, service, price, false);

            if let Some(assistant_id) = item.assistant_id {
                if assistant_id == item.staff_id {
                    return Err(CoreError::validation(
                        "assistant_id must differ from staff_id",
                    ));
                }
                let assistant = active_staff(staff, assistant_id)?;
                push_commission(&mut commissions, assistant, service, price, true);
            }

            Ok(NewTransactionItem {
                service_id: service.id,
                service_name: service.name.clone(),
                category: service.category.clone(),
                price,
                staff_id: performer.id,
                assistant_id: item.assistant_id,
                commissions,
            })
        })
        .collect()
}

fn active_staff(staff: &HashMap<DbId, Staff>, id: DbId) -> Result<&Staff, CoreError> {
    let member = staff.get(&id).ok_or(CoreError::not_found("Staff", id))?;
    if !member.is_active {
        return Err(CoreError::Validation(format!(
            "Staff member '{}' is inactive",
            member.name
        )));
    }
    Ok(member)
}

/// Append a commission for `member` if the rule grants one.
fn push_commission(
    out: &mut Vec<NewCommission>,
    member: &Staff,
    service: &Service,
    price: f64,
    is_assist: bool,
) {
    let role = StaffRole::parse(&member.role);
    let amount = calculate_commission(price, &service.category, role, is_assist);
    if amount <= 0.0 {
        return;
    }
    let rate = commission_rate(&service.category, role, is_assist);
    let action = if is_assist { "assisting" } else { "performing" };
    out.push(NewCommission {
        staff_id: member.id,
        amount,
        is_assist,
        reason: format!("{rate}% for {action} {}", service.name),
    });
}

fn normalize_transaction_status(value: &str) -> Result<String, CoreError> {
    let upper = value.trim().to_ascii_uppercase();
    if upper == STATUS_COMPLETED || upper == STATUS_VOID {
        Ok(upper)
    } else {
        Err(CoreError::Validation(format!(
            "status must be {STATUS_COMPLETED} or {STATUS_VOID}, got '{value}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/transactions?from=&to=&status=&customer_id=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<impl IntoResponse> {
    let range = DateRangeParams {
        date: None,
        from: params.from,
        to: params.to,
    };
    let (from, to) = if range.is_empty() {
        (None, None)
    } else {
        let (start, end) = range.resolve()?;
        (Some(start), Some(end))
    };
    let filter = TransactionFilter {
        from,
        to,
        status: params
            .status
            .as_deref()
            .map(normalize_transaction_status)
            .transpose()?,
        customer_id: params.customer_id,
    };

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let transactions = TransactionRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(PageResponse {
        data: transactions,
        limit,
        offset,
    }))
}

/// POST /api/v1/transactions
///
/// Record a completed sale. The total is the sum of the item prices.
pub async fn checkout(
    State(state): State<AppState>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    let payment_method = normalize_payment_method(&input.payment_method)?;
    validate_notes(input.notes.as_deref())?;

    if let Some(customer_id) = input.customer_id {
        CustomerRepo::find_by_id(&state.pool, customer_id)
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Customer", customer_id)))?;
    }
    if let Some(appointment_id) = input.appointment_id {
        let appointment = AppointmentRepo::find_by_id(&state.pool, appointment_id)
            .await?
            .ok_or(AppError::Core(CoreError::not_found(
                "Appointment",
                appointment_id,
            )))?;
        validate_transition(&appointment.status, APPOINTMENT_COMPLETED)?;
    }
    if let Some(created_by) = input.created_by {
        StaffRepo::find_by_id(&state.pool, created_by)
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Staff", created_by)))?;
    }

    let service_ids: Vec<DbId> = input.items.iter().map(|i| i.service_id).collect();
    let staff_ids: Vec<DbId> = input
        .items
        .iter()
        .flat_map(|i| std::iter::once(i.staff_id).chain(i.assistant_id))
        .collect();
    let services: HashMap<DbId, Service> = ServiceRepo::find_by_ids(&state.pool, &service_ids)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let staff: HashMap<DbId, Staff> = StaffRepo::find_by_ids(&state.pool, &staff_ids)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let items = resolve_items(&input.items, &services, &staff)?;
    let sale = NewTransaction {
        customer_id: input.customer_id,
        appointment_id: input.appointment_id,
        total_amount: money::sum(items.iter().map(|i| i.price)),
        payment_method,
        notes: input.notes,
        created_by: input.created_by,
        items,
    };

    let created = match TransactionRepo::create_checkout(&state.pool, &sale).await? {
        CheckoutOutcome::Created(created) => created,
        CheckoutOutcome::AppointmentNotOpen => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Appointment {} is no longer open for checkout",
                sale.appointment_id.unwrap_or_default()
            ))))
        }
    };

    tracing::info!(
        transaction_id = created.transaction.id,
        total = created.transaction.total_amount,
        payment_method = %created.transaction.payment_method,
        items = created.items.len(),
        customer_id = ?created.transaction.customer_id,
        "Checkout recorded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/transactions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transaction = TransactionRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Transaction", id)))?;
    Ok(Json(DataResponse { data: transaction }))
}

/// POST /api/v1/transactions/{id}/void
///
/// Requires the PIN of an active manager or admin. Marks the sale VOID and
/// reverses its effect on the linked customer's statistics.
pub async fn void(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<VoidRequest>,
) -> AppResult<impl IntoResponse> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Core(CoreError::validation(
            "reason must not be empty",
        )));
    }
    validate_notes(Some(reason))?;
    validate_pin(&input.pin)?;

    let managers = StaffRepo::list_active_managers(&state.pool).await?;
    let authorizer = find_by_pin(&input.pin, &managers).ok_or_else(|| {
        tracing::warn!(transaction_id = id, "Void rejected: PIN is not a manager's");
        AppError::Core(CoreError::Forbidden(
            "A manager or admin PIN is required to void a transaction".into(),
        ))
    })?;

    match TransactionRepo::void(&state.pool, id, authorizer.id, reason).await? {
        VoidOutcome::NotFound => Err(AppError::Core(CoreError::not_found("Transaction", id))),
        VoidOutcome::AlreadyVoid => Err(AppError::Core(CoreError::Validation(format!(
            "Transaction {id} is already void"
        )))),
        VoidOutcome::Voided {
            transaction,
            customer,
        } => {
            tracing::info!(
                transaction_id = id,
                amount = transaction.total_amount,
                voided_by = authorizer.id,
                customer_id = ?transaction.customer_id,
                "Transaction voided",
            );
            Ok(Json(DataResponse {
                data: VoidResponse {
                    transaction,
                    customer,
                },
            }))
        }
    }
}

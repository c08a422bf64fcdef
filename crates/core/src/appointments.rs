//! Appointment status lifecycle and staff double-booking checks.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

pub const STATUS_SCHEDULED: &str = "SCHEDULED";
pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUS_NO_SHOW: &str = "NO_SHOW";

pub const APPOINTMENT_STATUSES: &[&str] = &[
    STATUS_SCHEDULED,
    STATUS_CONFIRMED,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
    STATUS_NO_SHOW,
];

/// Statuses that still occupy the assigned staff member's calendar.
pub const ACTIVE_STATUSES: &[&str] = &[STATUS_SCHEDULED, STATUS_CONFIRMED];

/// Longest bookable appointment (12 hours).
pub const MAX_DURATION_MINUTES: i32 = 12 * 60;

/// Upper-case and validate an appointment status.
pub fn normalize_status(value: &str) -> Result<String, CoreError> {
    let upper = value.trim().to_ascii_uppercase();
    if APPOINTMENT_STATUSES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(CoreError::Validation(format!(
            "status must be one of {}, got '{value}'",
            APPOINTMENT_STATUSES.join(", ")
        )))
    }
}

/// Whether an appointment in status `from` may move to status `to`.
///
/// COMPLETED, CANCELLED and NO_SHOW are terminal.
pub fn can_transition(from: &str, to: &str) -> bool {
    match from {
        STATUS_SCHEDULED => matches!(
            to,
            STATUS_CONFIRMED | STATUS_COMPLETED | STATUS_CANCELLED | STATUS_NO_SHOW
        ),
        STATUS_CONFIRMED => matches!(to, STATUS_COMPLETED | STATUS_CANCELLED | STATUS_NO_SHOW),
        _ => false,
    }
}

/// Validate a status transition, returning a validation error naming both ends.
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot change appointment status from {from} to {to}"
        )))
    }
}

pub fn validate_duration(minutes: i32) -> Result<(), CoreError> {
    if minutes <= 0 || minutes > MAX_DURATION_MINUTES {
        return Err(CoreError::Validation(format!(
            "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}, got {minutes}"
        )));
    }
    Ok(())
}

/// End time of an appointment starting at `start` lasting `minutes`.
pub fn end_time(start: Timestamp, minutes: i32) -> Timestamp {
    start + Duration::minutes(i64::from(minutes))
}

/// Half-open interval overlap: back-to-back appointments do not collide.
pub fn overlaps(start_a: Timestamp, minutes_a: i32, start_b: Timestamp, minutes_b: i32) -> bool {
    start_a < end_time(start_b, minutes_b) && start_b < end_time(start_a, minutes_a)
}

//! Shared query parameter types for API handlers.

use chrono::{Days, NaiveDate, Utc};
use salon_core::error::CoreError;
use salon_core::types::Timestamp;
use serde::Deserialize;

/// Longest period a single report or listing range may span.
pub const MAX_RANGE_DAYS: u64 = 366;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `salon_db::clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Calendar-day range parameters (`?date=` or `?from=&to=`), `YYYY-MM-DD`.
///
/// Days are interpreted in UTC. `to` is inclusive.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DateRangeParams {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeParams {
    /// Whether any of the range fields were supplied.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.from.is_none() && self.to.is_none()
    }

    /// Resolve to a half-open `[start, end)` timestamp range.
    ///
    /// `date` wins over `from`/`to`. A missing bound takes the value of the
    /// other one; with no parameters at all, the range is today.
    pub fn resolve(&self) -> Result<(Timestamp, Timestamp), CoreError> {
        self.resolve_with_today(Utc::now().date_naive())
    }

    pub fn resolve_with_today(&self, today: NaiveDate) -> Result<(Timestamp, Timestamp), CoreError> {
        let (first, last) = match (self.date, self.from, self.to) {
            (Some(date), _, _) => (date, date),
            (None, Some(from), Some(to)) => (from, to),
            (None, Some(from), None) => (from, from),
            (None, None, Some(to)) => (to, to),
            (None, None, None) => (today, today),
        };

        if first > last {
            return Err(CoreError::Validation(format!(
                "from ({first}) must not be after to ({last})"
            )));
        }
        let span = (last - first).num_days() as u64 + 1;
        if span > MAX_RANGE_DAYS {
            return Err(CoreError::Validation(format!(
                "date range must not exceed {MAX_RANGE_DAYS} days, got {span}"
            )));
        }

        let end_day = last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| CoreError::Validation(format!("to ({last}) is out of range")))?;
        Ok((start_of_day(first), start_of_day(end_day)))
    }
}

fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_range_is_today() {
        let (start, end) = DateRangeParams::default()
            .resolve_with_today(day(2026, 5, 1))
            .unwrap();
        assert_eq!(start.to_rfc3339(), "2026-05-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-05-02T00:00:00+00:00");
    }

    #[test]
    fn date_overrides_from_and_to() {
        let params = DateRangeParams {
            date: Some(day(2026, 2, 28)),
            from: Some(day(2026, 1, 1)),
            to: Some(day(2026, 1, 31)),
        };
        let (start, end) = params.resolve_with_today(day(2026, 5, 1)).unwrap();
        assert_eq!(start.date_naive(), day(2026, 2, 28));
        assert_eq!(end.date_naive(), day(2026, 3, 1));
    }

    #[test]
    fn to_is_inclusive() {
        let params = DateRangeParams {
            date: None,
            from: Some(day(2026, 1, 1)),
            to: Some(day(2026, 1, 31)),
        };
        let (start, end) = params.resolve_with_today(day(2026, 5, 1)).unwrap();
        assert_eq!(start.date_naive(), day(2026, 1, 1));
        assert_eq!(end.date_naive(), day(2026, 2, 1));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let params = DateRangeParams {
            date: None,
            from: Some(day(2026, 2, 1)),
            to: Some(day(2026, 1, 1)),
        };
        assert!(params.resolve_with_today(day(2026, 5, 1)).is_err());
    }

    #[test]
    fn overlong_range_is_rejected() {
        let params = DateRangeParams {
            date: None,
            from: Some(day(2024, 1, 1)),
            to: Some(day(2026, 1, 1)),
        };
        let err = params.resolve_with_today(day(2026, 5, 1)).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }
}

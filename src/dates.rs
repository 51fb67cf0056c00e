use chrono::{DateTime, Duration, NaiveDate};

use crate::error::CycleError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a caller-supplied date. Accepts `YYYY-MM-DD` or an RFC 3339
/// timestamp, in which case the calendar date in its own offset is used.
pub fn parse_date(field: &'static str, input: &str) -> Result<NaiveDate, CycleError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| CycleError::InvalidDate {
            field,
            input: input.to_string(),
        })
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// `Math.round` semantics: halves round towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

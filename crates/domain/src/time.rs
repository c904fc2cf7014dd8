//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for `recorded_at`, `created_at`, report ranges, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to the microsecond precision
/// that [`to_sortable`] stores.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Parse an RFC 3339 timestamp, normalising it to UTC microseconds.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] when `value` is not RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc().trunc_subsecs(6))
        .map_err(|_| ValidationError::InvalidTimestamp(value.to_owned()))
}

/// Fixed-width RFC 3339 form (microseconds, `Z` suffix).
///
/// Every timestamp rendered this way has the same length, so lexical order
/// matches chronological order.
#[must_use]
pub fn to_sortable(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

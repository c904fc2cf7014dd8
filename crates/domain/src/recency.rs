//! Recency thresholds used to classify sensor data as live.

use chrono::Duration;

use crate::time::Timestamp;

/// A device counts as paired once it has reported within this window.
pub const VERIFICATION_WINDOW: Duration = Duration::seconds(120);

/// The latest reading counts as live within this window.
pub const LIVE_WINDOW: Duration = Duration::seconds(300);

/// `true` when `recorded_at` is strictly less than `window` before `now`.
#[must_use]
pub fn is_recent(recorded_at: Timestamp, now: Timestamp, window: Duration) -> bool {
    now - recorded_at < window
}

/// Whole seconds elapsed since `recorded_at`, rounded down.
#[must_use]
pub fn elapsed_seconds(recorded_at: Timestamp, now: Timestamp) -> i64 {
    (now - recorded_at).num_milliseconds().div_euclid(1000)
}

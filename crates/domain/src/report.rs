//! Report: a user-requested session summary over a device's readings.
//!
//! No document is rendered yet: `file_url` points at a synthetic path that a
//! future rendering pipeline will populate.

use serde::{Deserialize, Serialize};

use crate::device::DeviceSummary;
use crate::error::{SensorHubError, ValidationError};
use crate::id::{DeviceId, ReportId, UserId};
use crate::time::Timestamp;

/// A stored session report. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    pub device_id: DeviceId,
    pub from: Timestamp,
    pub to: Timestamp,
    pub file_url: String,
    pub created_at: Timestamp,
}

impl Report {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when `from` is after `to`.
    pub fn validate(&self) -> Result<(), SensorHubError> {
        if self.from > self.to {
            return Err(ValidationError::InvalidTimeRange.into());
        }
        Ok(())
    }
}

/// Placeholder artifact path for a report created at `at`.
#[must_use]
pub fn placeholder_file_url(device_id: DeviceId, at: Timestamp) -> String {
    format!("/reports/report-{device_id}-{}.pdf", at.timestamp_millis())
}

/// Display name used when the caller does not provide one.
#[must_use]
pub fn default_name(at: Timestamp) -> String {
    format!("Session Report {}", at.format("%Y-%m-%d"))
}

/// A report annotated with the device it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWithDevice {
    #[serde(flatten)]
    pub report: Report,
    pub device: DeviceSummary,
}

/// Everything needed to create a report, before the owner is resolved.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub device_id: DeviceId,
    pub from: Timestamp,
    pub to: Timestamp,
    pub name: Option<String>,
    pub user_id: Option<UserId>,
    /// Number of readings the client included in the session.
    pub readings_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn report(from: Timestamp, to: Timestamp) -> Report {
        Report {
            id: ReportId::new(),
            user_id: UserId::new("user_1").unwrap(),
            device_id: DeviceId::new(),
            from,
            to,
            file_url: String::new(),
            created_at: to,
        }
    }

    #[test]
    fn should_accept_range_where_from_equals_to() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert!(report(at, at).validate().is_ok());
    }

    #[test]
    fn should_reject_range_ending_before_it_starts() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let result = report(at, at - Duration::minutes(1)).validate();
        assert!(matches!(
            result,
            Err(SensorHubError::Validation(ValidationError::InvalidTimeRange))
        ));
    }

    #[test]
    fn should_embed_device_and_time_in_file_url() {
        let device_id = DeviceId::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            placeholder_file_url(device_id, at),
            format!("/reports/report-{device_id}-1700000000123.pdf")
        );
    }

    #[test]
    fn should_default_name_to_creation_date() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        assert_eq!(default_name(at), "Session Report 2024-05-01");
    }
}

//! Storage port: repository traits for persistence.
//!
//! The storage collaborator provides durable, transactional CRUD. Every
//! method is a single operation; callers never batch or coordinate.

use std::future::Future;

use sensorhub_domain::device::Device;
use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::id::{DeviceId, UserId};
use sensorhub_domain::pagination::PageRequest;
use sensorhub_domain::reading::{Reading, ReadingWithDevice};
use sensorhub_domain::report::{Report, ReportWithDevice};

/// Repository for [`Device`]s.
pub trait DeviceRepository {
    /// Persist a new device. Used by provisioning tooling.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, SensorHubError>> + Send;

    /// Get a device by its unique identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, SensorHubError>> + Send;

    /// Get a device by its pairing serial.
    fn find_by_serial(
        &self,
        serial: &str,
    ) -> impl Future<Output = Result<Option<Device>, SensorHubError>> + Send;
}

/// Which readings a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingFilter {
    /// Every reading.
    All,
    /// Readings of one device.
    Device(DeviceId),
    /// Readings of every device owned by a user.
    User(UserId),
}

/// Repository for [`Reading`]s.
pub trait ReadingRepository {
    /// Persist a new reading.
    fn create(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SensorHubError>> + Send;

    /// The most recent reading of a device, if any.
    fn latest_for_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<Reading>, SensorHubError>> + Send;

    /// A newest-first window of readings matching `filter`.
    fn list(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<ReadingWithDevice>, SensorHubError>> + Send;

    /// Number of readings matching `filter`.
    fn count(
        &self,
        filter: ReadingFilter,
    ) -> impl Future<Output = Result<u64, SensorHubError>> + Send;
}

/// Repository for [`Report`]s.
pub trait ReportRepository {
    /// Persist a new report.
    fn create(&self, report: Report)
    -> impl Future<Output = Result<Report, SensorHubError>> + Send;

    /// A newest-first window of a user's reports.
    fn list_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<ReportWithDevice>, SensorHubError>> + Send;

    /// Number of reports owned by a user.
    fn count_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, SensorHubError>> + Send;
}

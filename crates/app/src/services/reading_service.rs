//! Reading service: use-cases for device measurements.

use sensorhub_domain::error::{NotFoundError, SensorHubError};
use sensorhub_domain::id::DeviceId;
use sensorhub_domain::pagination::{Page, PageRequest, Pagination};
use sensorhub_domain::reading::{Reading, ReadingWithDevice};
use sensorhub_domain::recency::{LIVE_WINDOW, elapsed_seconds, is_recent};
use sensorhub_domain::time::now;

use crate::ports::{DeviceRepository, ReadingFilter, ReadingRepository};

/// The newest reading of a device together with its freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub reading: Reading,
    /// Recorded within the live window.
    pub is_recent: bool,
    /// Whole seconds since the reading was recorded.
    pub time_since_reading: i64,
}

/// Application service for readings.
pub struct ReadingService<DR, RR> {
    devices: DR,
    readings: RR,
}

impl<DR, RR> ReadingService<DR, RR>
where
    DR: DeviceRepository,
    RR: ReadingRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(devices: DR, readings: RR) -> Self {
        Self { devices, readings }
    }

    /// Most recent reading of a device.
    ///
    /// The device itself is not looked up: an unknown device simply has no
    /// readings.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::NotFound`] when the device has no readings,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn latest_reading(
        &self,
        device_id: DeviceId,
    ) -> Result<LatestReading, SensorHubError> {
        let reading = self
            .readings
            .latest_for_device(device_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Reading for device",
                id: device_id.to_string(),
            })?;

        let current = now();
        Ok(LatestReading {
            is_recent: is_recent(reading.recorded_at, current, LIVE_WINDOW),
            time_since_reading: elapsed_seconds(reading.recorded_at, current),
            reading,
        })
    }

    /// A newest-first page of readings.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_readings(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> Result<Page<ReadingWithDevice>, SensorHubError> {
        let items = self.readings.list(filter.clone(), page).await?;
        let total = self.readings.count(filter).await?;
        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    /// Store a reading for an existing device.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::NotFound`] when the device does not exist,
    /// [`SensorHubError::Validation`] if a measurement is not finite, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, reading), fields(device_id = %reading.device_id))]
    pub async fn create_reading(&self, reading: Reading) -> Result<Reading, SensorHubError> {
        reading.validate()?;
        if self.devices.get_by_id(reading.device_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "Device",
                id: reading.device_id.to_string(),
            }
            .into());
        }
        self.readings.create(reading).await
    }
}

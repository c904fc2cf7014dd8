//! Device service: pairing verification.

use sensorhub_domain::device::Device;
use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::recency::{VERIFICATION_WINDOW, is_recent};
use sensorhub_domain::time::{Timestamp, now};

use crate::ports::{DeviceRepository, ReadingRepository};

/// Outcome of a pairing check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    /// No device carries the given serial.
    UnknownDevice,
    /// The device exists but has not reported within the verification window.
    AwaitingData { device: Device },
    /// The device reported recently; pairing is confirmed.
    Verified { device: Device, last_seen: Timestamp },
}

impl Verification {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// Application service for device pairing.
pub struct DeviceService<DR, RR> {
    devices: DR,
    readings: RR,
}

impl<DR, RR> DeviceService<DR, RR>
where
    DR: DeviceRepository,
    RR: ReadingRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(devices: DR, readings: RR) -> Self {
        Self { devices, readings }
    }

    /// Check whether the device with `serial` is live.
    ///
    /// `code` is accepted for forward compatibility; pairing codes are not
    /// stored yet, so it is not compared with anything.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories. An unknown
    /// serial is not an error.
    #[tracing::instrument(skip(self, code))]
    pub async fn verify_device(
        &self,
        serial: &str,
        code: &str,
    ) -> Result<Verification, SensorHubError> {
        tracing::debug!(code_len = code.len(), "pairing code received");

        let Some(device) = self.devices.find_by_serial(serial).await? else {
            return Ok(Verification::UnknownDevice);
        };

        let latest = self.readings.latest_for_device(device.id).await?;
        let current = now();
        match latest {
            Some(reading) if is_recent(reading.recorded_at, current, VERIFICATION_WINDOW) => {
                Ok(Verification::Verified {
                    device,
                    last_seen: reading.recorded_at,
                })
            }
            _ => Ok(Verification::AwaitingData { device }),
        }
    }

    /// Register a device. Provisioning entry point; not exposed over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(serial = %device.serial))]
    pub async fn register_device(&self, device: Device) -> Result<Device, SensorHubError> {
        device.validate()?;
        self.devices.create(device).await
    }
}

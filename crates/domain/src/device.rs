//! Device: a physical sensor unit identified by a unique serial.

use serde::{Deserialize, Serialize};

use crate::error::{SensorHubError, ValidationError};
use crate::id::{DeviceId, UserId};

/// A paired (or pairable) sensor.
///
/// Devices are created by the provisioning flow and are only read by the
/// request handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    /// Unique pairing serial printed on the unit.
    pub serial: String,
    pub name: String,
    /// Owning user; `None` until the device is claimed.
    pub user_id: Option<UserId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when `serial` is empty.
    pub fn validate(&self) -> Result<(), SensorHubError> {
        if self.serial.trim().is_empty() {
            return Err(ValidationError::EmptySerial.into());
        }
        Ok(())
    }

    /// The compact form attached to listed readings and reports.
    #[must_use]
    pub fn summary(&self) -> DeviceSummary {
        DeviceSummary {
            id: self.id,
            name: self.name.clone(),
            serial: self.serial.clone(),
        }
    }
}

/// Compact device description embedded in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: DeviceId,
    pub name: String,
    pub serial: String,
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    serial: Option<String>,
    name: Option<String>,
    user_id: Option<UserId>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] if `serial` is missing or empty.
    pub fn build(self) -> Result<Device, SensorHubError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            serial: self.serial.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            user_id: self.user_id,
        };
        device.validate()?;
        Ok(device)
    }
}

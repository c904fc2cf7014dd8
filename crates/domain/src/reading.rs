//! Reading: one timestamped measurement uploaded by a device.

use serde::{Deserialize, Serialize};

use crate::device::DeviceSummary;
use crate::error::{SensorHubError, ValidationError};
use crate::id::{DeviceId, ReadingId};
use crate::time::Timestamp;

/// A single air-quality sample. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: ReadingId,
    pub device_id: DeviceId,
    /// Total volatile organic compounds, ppb.
    pub tvoc: f64,
    /// Equivalent CO2, ppm.
    pub eco2: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub status_msg: Option<String>,
    pub recorded_at: Timestamp,
}

impl Reading {
    /// Create a builder for constructing a [`Reading`].
    #[must_use]
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when a measurement is NaN or
    /// infinite.
    pub fn validate(&self) -> Result<(), SensorHubError> {
        let fields = [
            ("tvoc", self.tvoc),
            ("eco2", self.eco2),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ValidationError::InvalidNumber {
                    field,
                    value: value.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// A reading annotated with the device that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingWithDevice {
    #[serde(flatten)]
    pub reading: Reading,
    pub device: DeviceSummary,
}

/// Step-by-step builder for [`Reading`].
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    id: Option<ReadingId>,
    device_id: Option<DeviceId>,
    tvoc: f64,
    eco2: f64,
    temperature: f64,
    humidity: f64,
    status_msg: Option<String>,
    recorded_at: Option<Timestamp>,
}

impl ReadingBuilder {
    #[must_use]
    pub fn id(mut self, id: ReadingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn tvoc(mut self, tvoc: f64) -> Self {
        self.tvoc = tvoc;
        self
    }

    #[must_use]
    pub fn eco2(mut self, eco2: f64) -> Self {
        self.eco2 = eco2;
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn humidity(mut self, humidity: f64) -> Self {
        self.humidity = humidity;
        self
    }

    #[must_use]
    pub fn status_msg(mut self, status_msg: impl Into<String>) -> Self {
        self.status_msg = Some(status_msg.into());
        self
    }

    /// Override the timestamp. Defaults to the time of [`build`](Self::build).
    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder, validate, and return a [`Reading`].
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] if a measurement is not finite.
    pub fn build(self) -> Result<Reading, SensorHubError> {
        let reading = Reading {
            id: self.id.unwrap_or_default(),
            device_id: self.device_id.unwrap_or_default(),
            tvoc: self.tvoc,
            eco2: self.eco2,
            temperature: self.temperature,
            humidity: self.humidity,
            status_msg: self.status_msg,
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
        };
        reading.validate()?;
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_build_reading_with_all_fields() {
        let device_id = DeviceId::new();
        let recorded = now();

        let reading = Reading::builder()
            .device_id(device_id)
            .tvoc(1.2)
            .eco2(400.0)
            .temperature(22.5)
            .humidity(45.0)
            .status_msg("warming up")
            .recorded_at(recorded)
            .build()
            .unwrap();

        assert_eq!(reading.device_id, device_id);
        assert!((reading.tvoc - 1.2).abs() < f64::EPSILON);
        assert_eq!(reading.status_msg.as_deref(), Some("warming up"));
        assert_eq!(reading.recorded_at, recorded);
    }

    #[test]
    fn should_stamp_recorded_at_when_not_provided() {
        let before = now();
        let reading = Reading::builder().device_id(DeviceId::new()).build().unwrap();
        assert!(reading.recorded_at >= before);
    }

    #[test]
    fn should_accept_zero_measurements() {
        let reading = Reading::builder().device_id(DeviceId::new()).build();
        assert!(reading.is_ok());
    }

    #[test]
    fn should_reject_nan_measurement() {
        let result = Reading::builder()
            .device_id(DeviceId::new())
            .humidity(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(SensorHubError::Validation(ValidationError::InvalidNumber {
                field: "humidity",
                ..
            }))
        ));
    }

    #[test]
    fn should_flatten_reading_next_to_device_summary() {
        let reading = Reading::builder()
            .device_id(DeviceId::new())
            .eco2(612.0)
            .build()
            .unwrap();
        let annotated = ReadingWithDevice {
            device: DeviceSummary {
                id: reading.device_id,
                name: "Kitchen".to_string(),
                serial: "AQ-9".to_string(),
            },
            reading,
        };

        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(json["eco2"], 612.0);
        assert_eq!(json["device"]["serial"], "AQ-9");
        assert!(json.get("recordedAt").is_some());
        assert!(json.get("statusMsg").is_some());
    }
}

//! Shared application state for axum handlers.

use std::sync::Arc;

use sensorhub_app::ports::{DeviceRepository, ReadingRepository, ReportRepository};
use sensorhub_app::services::device_service::DeviceService;
use sensorhub_app::services::reading_service::ReadingService;
use sensorhub_app::services::report_service::ReportService;

/// Application state shared across all axum handlers.
///
/// Generic over the device, reading and report repositories to avoid
/// dynamic dispatch. `Clone` is implemented manually so the repositories
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<DR, RR, PR> {
    /// Pairing verification.
    pub device_service: Arc<DeviceService<DR, RR>>,
    /// Reading queries and uploads.
    pub reading_service: Arc<ReadingService<DR, RR>>,
    /// Session reports.
    pub report_service: Arc<ReportService<DR, PR>>,
}

impl<DR, RR, PR> Clone for AppState<DR, RR, PR> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
            reading_service: Arc::clone(&self.reading_service),
            report_service: Arc::clone(&self.report_service),
        }
    }
}

impl<DR, RR, PR> AppState<DR, RR, PR>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        device_service: DeviceService<DR, RR>,
        reading_service: ReadingService<DR, RR>,
        report_service: ReportService<DR, PR>,
    ) -> Self {
        Self::from_arcs(
            Arc::new(device_service),
            Arc::new(reading_service),
            Arc::new(report_service),
        )
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    pub fn from_arcs(
        device_service: Arc<DeviceService<DR, RR>>,
        reading_service: Arc<ReadingService<DR, RR>>,
        report_service: Arc<ReportService<DR, PR>>,
    ) -> Self {
        Self {
            device_service,
            reading_service,
            report_service,
        }
    }
}

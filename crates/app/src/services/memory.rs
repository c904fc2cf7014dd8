//! In-memory repositories shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sensorhub_domain::device::Device;
use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::id::{DeviceId, UserId};
use sensorhub_domain::pagination::PageRequest;
use sensorhub_domain::reading::{Reading, ReadingWithDevice};
use sensorhub_domain::report::{Report, ReportWithDevice};

use crate::ports::{DeviceRepository, ReadingFilter, ReadingRepository, ReportRepository};

#[derive(Default)]
struct State {
    devices: HashMap<DeviceId, Device>,
    readings: Vec<Reading>,
    reports: Vec<Report>,
}

/// One store implementing every repository port, so services that share
/// devices and readings see the same data.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    fn matching_readings(state: &State, filter: &ReadingFilter) -> Vec<ReadingWithDevice> {
        let mut rows: Vec<ReadingWithDevice> = state
            .readings
            .iter()
            .filter_map(|reading| {
                let device = state.devices.get(&reading.device_id)?;
                let keep = match filter {
                    ReadingFilter::All => true,
                    ReadingFilter::Device(id) => reading.device_id == *id,
                    ReadingFilter::User(user) => device.user_id.as_ref() == Some(user),
                };
                keep.then(|| ReadingWithDevice {
                    reading: reading.clone(),
                    device: device.summary(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.reading.recorded_at.cmp(&a.reading.recorded_at));
        rows
    }

    fn user_reports(state: &State, user_id: &UserId) -> Vec<ReportWithDevice> {
        let mut rows: Vec<ReportWithDevice> = state
            .reports
            .iter()
            .filter(|report| &report.user_id == user_id)
            .filter_map(|report| {
                let device = state.devices.get(&report.device_id)?;
                Some(ReportWithDevice {
                    report: report.clone(),
                    device: device.summary(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.report.created_at.cmp(&a.report.created_at));
        rows
    }
}

fn window<T>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

impl DeviceRepository for InMemoryStore {
    async fn create(&self, device: Device) -> Result<Device, SensorHubError> {
        let mut state = self.state.lock().unwrap();
        state.devices.insert(device.id, device.clone());
        Ok(device)
    }

    async fn get_by_id(&self, id: DeviceId) -> Result<Option<Device>, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(state.devices.get(&id).cloned())
    }

    async fn find_by_serial(&self, serial: &str) -> Result<Option<Device>, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(state.devices.values().find(|d| d.serial == serial).cloned())
    }
}

impl ReadingRepository for InMemoryStore {
    async fn create(&self, reading: Reading) -> Result<Reading, SensorHubError> {
        let mut state = self.state.lock().unwrap();
        state.readings.push(reading.clone());
        Ok(reading)
    }

    async fn latest_for_device(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<Reading>, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .readings
            .iter()
            .filter(|r| r.device_id == device_id)
            .max_by_key(|r| r.recorded_at)
            .cloned())
    }

    async fn list(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> Result<Vec<ReadingWithDevice>, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(window(Self::matching_readings(&state, &filter), page))
    }

    async fn count(&self, filter: ReadingFilter) -> Result<u64, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(Self::matching_readings(&state, &filter).len() as u64)
    }
}

impl ReportRepository for InMemoryStore {
    async fn create(&self, report: Report) -> Result<Report, SensorHubError> {
        let mut state = self.state.lock().unwrap();
        state.reports.push(report.clone());
        Ok(report)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<ReportWithDevice>, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(window(Self::user_reports(&state, &user_id), page))
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<u64, SensorHubError> {
        let state = self.state.lock().unwrap();
        Ok(Self::user_reports(&state, &user_id).len() as u64)
    }
}

//! Report service: use-cases for session reports.

use sensorhub_domain::error::{NotFoundError, SensorHubError, ValidationError};
use sensorhub_domain::id::{ReportId, UserId};
use sensorhub_domain::pagination::{Page, PageRequest, Pagination};
use sensorhub_domain::report::{
    Report, ReportRequest, ReportWithDevice, default_name, placeholder_file_url,
};
use sensorhub_domain::time::now;

use crate::ports::{DeviceRepository, ReportRepository};

/// A freshly stored report plus the display data returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedReport {
    pub report: Report,
    pub name: String,
    pub readings_count: usize,
}

/// Application service for reports.
pub struct ReportService<DR, PR> {
    devices: DR,
    reports: PR,
}

impl<DR, PR> ReportService<DR, PR>
where
    DR: DeviceRepository,
    PR: ReportRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(devices: DR, reports: PR) -> Self {
        Self { devices, reports }
    }

    /// A newest-first page of a user's reports.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_reports(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<ReportWithDevice>, SensorHubError> {
        let items = self.reports.list_by_user(user_id.clone(), page).await?;
        let total = self.reports.count_by_user(user_id).await?;
        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    /// Create a report for a device's session.
    ///
    /// The owner is the explicit `user_id` of the request, falling back to
    /// the device's owner.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::NotFound`] when the device does not exist,
    /// [`SensorHubError::Validation`] when no owner can be resolved or the
    /// range is inverted, or a storage error from the repositories.
    #[tracing::instrument(skip(self, request), fields(device_id = %request.device_id))]
    pub async fn create_report(
        &self,
        request: ReportRequest,
    ) -> Result<CreatedReport, SensorHubError> {
        let device = self
            .devices
            .get_by_id(request.device_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Device",
                id: request.device_id.to_string(),
            })?;

        let user_id = request
            .user_id
            .or(device.user_id)
            .ok_or(ValidationError::UnresolvedOwner)?;

        let created_at = now();
        let report = Report {
            id: ReportId::new(),
            user_id,
            device_id: device.id,
            from: request.from,
            to: request.to,
            file_url: placeholder_file_url(device.id, created_at),
            created_at,
        };
        report.validate()?;

        let report = self.reports.create(report).await?;
        tracing::info!(report_id = %report.id, "report created");

        Ok(CreatedReport {
            name: request.name.unwrap_or_else(|| default_name(created_at)),
            readings_count: request.readings_count,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::InMemoryStore;
    use chrono::Duration;
    use sensorhub_domain::device::Device;
    use sensorhub_domain::id::DeviceId;

    fn make_service() -> (ReportService<InMemoryStore, InMemoryStore>, InMemoryStore) {
        let store = InMemoryStore::default();
        (ReportService::new(store.clone(), store.clone()), store)
    }

    async fn seed_device(store: &InMemoryStore, owner: Option<&str>) -> Device {
        let mut builder = Device::builder().serial("AQ-R1").name("Lab");
        if let Some(owner) = owner {
            builder = builder.user_id(UserId::new(owner).unwrap());
        }
        DeviceRepository::create(store, builder.build().unwrap())
            .await
            .unwrap()
    }

    fn request(device_id: DeviceId) -> ReportRequest {
        let to = now();
        ReportRequest {
            device_id,
            from: to - Duration::hours(1),
            to,
            name: None,
            user_id: None,
            readings_count: 0,
        }
    }

    #[tokio::test]
    async fn should_fall_back_to_device_owner() {
        let (svc, store) = make_service();
        let device = seed_device(&store, Some("alice")).await;

        let created = svc.create_report(request(device.id)).await.unwrap();
        assert_eq!(created.report.user_id.as_str(), "alice");
    }

    #[tokio::test]
    async fn should_prefer_explicit_user() {
        let (svc, store) = make_service();
        let device = seed_device(&store, Some("alice")).await;
        let mut req = request(device.id);
        req.user_id = Some(UserId::new("bob").unwrap());

        let created = svc.create_report(req).await.unwrap();
        assert_eq!(created.report.user_id.as_str(), "bob");
    }

    #[tokio::test]
    async fn should_reject_when_owner_cannot_be_resolved() {
        let (svc, store) = make_service();
        let device = seed_device(&store, None).await;

        let result = svc.create_report(request(device.id)).await;
        assert!(matches!(
            result,
            Err(SensorHubError::Validation(ValidationError::UnresolvedOwner))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let (svc, _) = make_service();
        let result = svc.create_report(request(DeviceId::new())).await;
        assert!(matches!(result, Err(SensorHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_reject_inverted_range() {
        let (svc, store) = make_service();
        let device = seed_device(&store, Some("alice")).await;
        let mut req = request(device.id);
        std::mem::swap(&mut req.from, &mut req.to);

        let result = svc.create_report(req).await;
        assert!(matches!(
            result,
            Err(SensorHubError::Validation(ValidationError::InvalidTimeRange))
        ));
    }

    #[tokio::test]
    async fn should_default_name_and_echo_readings_count() {
        let (svc, store) = make_service();
        let device = seed_device(&store, Some("alice")).await;
        let mut req = request(device.id);
        req.readings_count = 3;

        let created = svc.create_report(req).await.unwrap();
        assert!(created.name.starts_with("Session Report "));
        assert_eq!(created.readings_count, 3);
        assert!(created.report.file_url.contains(&device.id.to_string()));
    }

    #[tokio::test]
    async fn should_list_only_reports_of_user() {
        let (svc, store) = make_service();
        let device = seed_device(&store, Some("alice")).await;
        svc.create_report(request(device.id)).await.unwrap();
        svc.create_report(request(device.id)).await.unwrap();
        let mut other = request(device.id);
        other.user_id = Some(UserId::new("bob").unwrap());
        svc.create_report(other).await.unwrap();

        let page = svc
            .list_reports(UserId::new("alice").unwrap(), PageRequest::new(1, 0))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 2);
        assert!(page.pagination.has_more);
        assert_eq!(page.items[0].device.name, "Lab");
    }
}

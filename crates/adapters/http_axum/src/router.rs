//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use sensorhub_app::ports::{DeviceRepository, ReadingRepository, ReportRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and exposes `/health`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<DR, RR, PR>(state: AppState<DR, RR, PR>) -> Router
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sensorhub_app::ports::ReadingFilter;
    use sensorhub_app::services::device_service::DeviceService;
    use sensorhub_app::services::reading_service::ReadingService;
    use sensorhub_app::services::report_service::ReportService;
    use sensorhub_domain::device::Device;
    use sensorhub_domain::error::SensorHubError;
    use sensorhub_domain::id::{DeviceId, UserId};
    use sensorhub_domain::pagination::PageRequest;
    use sensorhub_domain::reading::{Reading, ReadingWithDevice};
    use sensorhub_domain::report::{Report, ReportWithDevice};
    use tower::ServiceExt;

    struct StubDeviceRepo;
    struct StubReadingRepo;
    struct StubReportRepo;

    impl DeviceRepository for StubDeviceRepo {
        async fn create(&self, device: Device) -> Result<Device, SensorHubError> {
            Ok(device)
        }
        async fn get_by_id(&self, _id: DeviceId) -> Result<Option<Device>, SensorHubError> {
            Ok(None)
        }
        async fn find_by_serial(&self, _serial: &str) -> Result<Option<Device>, SensorHubError> {
            Ok(None)
        }
    }

    impl ReadingRepository for StubReadingRepo {
        async fn create(&self, reading: Reading) -> Result<Reading, SensorHubError> {
            Ok(reading)
        }
        async fn latest_for_device(
            &self,
            _device_id: DeviceId,
        ) -> Result<Option<Reading>, SensorHubError> {
            Ok(None)
        }
        async fn list(
            &self,
            _filter: ReadingFilter,
            _page: PageRequest,
        ) -> Result<Vec<ReadingWithDevice>, SensorHubError> {
            Ok(vec![])
        }
        async fn count(&self, _filter: ReadingFilter) -> Result<u64, SensorHubError> {
            Ok(0)
        }
    }

    impl ReportRepository for StubReportRepo {
        async fn create(&self, report: Report) -> Result<Report, SensorHubError> {
            Ok(report)
        }
        async fn list_by_user(
            &self,
            _user_id: UserId,
            _page: PageRequest,
        ) -> Result<Vec<ReportWithDevice>, SensorHubError> {
            Ok(vec![])
        }
        async fn count_by_user(&self, _user_id: UserId) -> Result<u64, SensorHubError> {
            Ok(0)
        }
    }

    fn test_app() -> Router {
        build(AppState::new(
            DeviceService::new(StubDeviceRepo, StubReadingRepo),
            ReadingService::new(StubDeviceRepo, StubReadingRepo),
            ReportService::new(StubDeviceRepo, StubReportRepo),
        ))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_reject_verify_without_code() {
        let (status, body) = send(get("/api/devices/verify?serial=AQ-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required parameter: code");
    }

    #[tokio::test]
    async fn should_answer_unknown_serial_with_ok() {
        let (status, body) = send(get("/api/devices/verify?serial=AQ-1&code=1234")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verified"], false);
        assert_eq!(body["message"], "Device not found");
        assert!(body.get("device").is_none());
    }

    #[tokio::test]
    async fn should_return_404_when_device_has_no_reading() {
        let uri = format!("/api/readings/latest?deviceId={}", DeviceId::new());
        let (status, _) = send(get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_404_for_latest_with_opaque_unknown_device_id() {
        let (status, body) = send(get("/api/readings/latest?deviceId=dev-123")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Device dev-123 not found");
    }

    #[tokio::test]
    async fn should_return_empty_page_for_opaque_unknown_device_id() {
        let (status, body) = send(get("/api/readings?deviceId=dev-123&limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["readings"], serde_json::json!([]));
        assert_eq!(body["pagination"]["total"], 0);
        assert_eq!(body["pagination"]["limit"], 5);
    }

    #[tokio::test]
    async fn should_return_empty_page_with_defaults() {
        let (status, body) = send(get("/api/readings")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["readings"], serde_json::json!([]));
        assert_eq!(body["pagination"]["limit"], 50);
        assert_eq!(body["pagination"]["offset"], 0);
        assert_eq!(body["pagination"]["hasMore"], false);
    }

    #[tokio::test]
    async fn should_require_user_id_for_reports() {
        let (status, body) = send(get("/api/reports?limit=5")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("userId"));
    }

    #[tokio::test]
    async fn should_reject_malformed_json_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/readings")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn should_return_404_when_posting_reading_for_unknown_device() {
        let body = serde_json::json!({
            "deviceId": DeviceId::new(),
            "tvoc": 1.2,
            "eco2": 400,
            "temperature": 22.5,
            "humidity": 45,
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/readings")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

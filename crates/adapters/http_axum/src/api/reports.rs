//! JSON REST handlers for session reports.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use sensorhub_app::ports::{DeviceRepository, ReadingRepository, ReportRepository};
use sensorhub_app::services::report_service::CreatedReport;
use sensorhub_domain::error::{SensorHubError, ValidationError};
use sensorhub_domain::id::UserId;
use sensorhub_domain::pagination::Pagination;
use sensorhub_domain::report::{Report, ReportRequest, ReportWithDevice};
use sensorhub_domain::time::parse_rfc3339;

use super::{non_empty, page_request, parse_device_id, required};
use crate::error::ApiError;
use crate::state::AppState;

/// Page size used when `limit` is absent.
const DEFAULT_LIMIT: u32 = 20;

/// Query parameters for the list endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Request body for creating a report.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub device_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<String>,
    /// Only the length is used.
    pub readings: Option<Vec<serde_json::Value>>,
}

impl CreateReportRequest {
    fn into_request(self) -> Result<ReportRequest, SensorHubError> {
        let device_id = non_empty(self.device_id);
        let from = non_empty(self.from);
        let to = non_empty(self.to);

        let (Some(device_id), Some(from), Some(to)) = (&device_id, &from, &to) else {
            let missing = [("deviceId", &device_id), ("from", &from), ("to", &to)]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(field, _)| field)
                .collect();
            return Err(ValidationError::MissingFields(missing).into());
        };

        let from = parse_rfc3339(from.trim())?;
        let to = parse_rfc3339(to.trim())?;
        Ok(ReportRequest {
            device_id: parse_device_id(device_id)?,
            from,
            to,
            name: non_empty(self.name),
            user_id: non_empty(self.user_id).map(UserId::new).transpose()?,
            readings_count: self.readings.map_or(0, |readings| readings.len()),
        })
    }
}

/// Body of the list response.
#[derive(Serialize)]
pub struct ListBody {
    pub reports: Vec<ReportWithDevice>,
    pub pagination: Pagination,
}

/// Body of the create response: the stored report plus display fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBody {
    #[serde(flatten)]
    pub report: Report,
    pub name: String,
    pub readings_count: usize,
}

impl From<CreatedReport> for CreatedBody {
    fn from(value: CreatedReport) -> Self {
        Self {
            report: value.report,
            name: value.name,
            readings_count: value.readings_count,
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<ListBody>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/reports?userId=&limit=&offset=`
pub async fn list<DR, RR, PR>(
    State(state): State<AppState<DR, RR, PR>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    let Query(params) = query?;
    let user_id = UserId::new(required("userId", params.user_id)?)?;
    let page = page_request(params.limit, params.offset, DEFAULT_LIMIT)?;

    let page = state.report_service.list_reports(user_id, page).await?;
    Ok(ListResponse::Ok(Json(ListBody {
        reports: page.items,
        pagination: page.pagination,
    })))
}

/// `POST /api/reports`
pub async fn create<DR, RR, PR>(
    State(state): State<AppState<DR, RR, PR>>,
    body: Result<Json<CreateReportRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let request = req.into_request()?;
    let created = state.report_service.create_report(request).await?;
    Ok(CreateResponse::Created(Json(created.into())))
}

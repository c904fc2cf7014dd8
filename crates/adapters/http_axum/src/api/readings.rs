//! JSON REST handlers for readings.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use sensorhub_app::ports::{DeviceRepository, ReadingFilter, ReadingRepository, ReportRepository};
use sensorhub_domain::error::{SensorHubError, ValidationError};
use sensorhub_domain::id::UserId;
use sensorhub_domain::pagination::{PageRequest, Pagination};
use sensorhub_domain::reading::{Reading, ReadingWithDevice};

use super::{non_empty, page_request, parse_device_id, required};
use crate::error::ApiError;
use crate::state::AppState;

/// Page size used when `limit` is absent.
const DEFAULT_LIMIT: u32 = 50;

/// Query parameters for the latest-reading endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuery {
    pub device_id: Option<String>,
}

/// Query parameters for the list endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Takes precedence over `user_id` when both are given.
    pub device_id: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// A measurement as sent by devices: either a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
}

impl Measurement {
    fn into_f64(self, field: &'static str) -> Result<f64, ValidationError> {
        let value = match self {
            Self::Number(value) => value,
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidNumber {
                    field,
                    value: raw.clone(),
                })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::InvalidNumber {
                field,
                value: value.to_string(),
            })
        }
    }
}

/// Request body for uploading a reading.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    pub device_id: Option<String>,
    pub tvoc: Option<Measurement>,
    pub eco2: Option<Measurement>,
    pub temperature: Option<Measurement>,
    pub humidity: Option<Measurement>,
    pub status_msg: Option<String>,
}

impl CreateReadingRequest {
    /// Validate presence and shape of every field, then build the reading.
    fn into_reading(self) -> Result<Reading, SensorHubError> {
        let device_id = non_empty(self.device_id);
        let mut missing = Vec::new();
        if device_id.is_none() {
            missing.push("deviceId");
        }
        for (field, value) in [
            ("tvoc", &self.tvoc),
            ("eco2", &self.eco2),
            ("temperature", &self.temperature),
            ("humidity", &self.humidity),
        ] {
            if value.is_none() {
                missing.push(field);
            }
        }

        let (Some(device_id), Some(tvoc), Some(eco2), Some(temperature), Some(humidity)) = (
            device_id,
            self.tvoc,
            self.eco2,
            self.temperature,
            self.humidity,
        ) else {
            return Err(ValidationError::MissingFields(missing).into());
        };

        // Measurements before the device id.
        let mut builder = Reading::builder()
            .tvoc(tvoc.into_f64("tvoc")?)
            .eco2(eco2.into_f64("eco2")?)
            .temperature(temperature.into_f64("temperature")?)
            .humidity(humidity.into_f64("humidity")?)
            .device_id(parse_device_id(&device_id)?);
        if let Some(status_msg) = self.status_msg {
            builder = builder.status_msg(status_msg);
        }
        builder.build()
    }
}

/// Body of the latest-reading response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBody {
    pub reading: Reading,
    pub is_recent: bool,
    pub time_since_reading: i64,
}

/// Body of the list response.
#[derive(Serialize)]
pub struct ListBody {
    pub readings: Vec<ReadingWithDevice>,
    pub pagination: Pagination,
}

impl ListBody {
    fn empty(page: PageRequest) -> Self {
        Self {
            readings: Vec::new(),
            pagination: Pagination::new(page, 0),
        }
    }
}

/// Possible responses from the latest-reading endpoint.
pub enum LatestResponse {
    Ok(Json<LatestBody>),
}

impl IntoResponse for LatestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
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
    Created(Json<Reading>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/readings/latest?deviceId=`
pub async fn latest<DR, RR, PR>(
    State(state): State<AppState<DR, RR, PR>>,
    query: Result<Query<LatestQuery>, QueryRejection>,
) -> Result<LatestResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    let Query(params) = query?;
    let device_id = parse_device_id(&required("deviceId", params.device_id)?)?;

    let latest = state.reading_service.latest_reading(device_id).await?;
    Ok(LatestResponse::Ok(Json(LatestBody {
        reading: latest.reading,
        is_recent: latest.is_recent,
        time_since_reading: latest.time_since_reading,
    })))
}

/// `GET /api/readings?deviceId=&userId=&limit=&offset=`
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
    let page = page_request(params.limit, params.offset, DEFAULT_LIMIT)?;
    let filter = match (non_empty(params.device_id), non_empty(params.user_id)) {
        (Some(device_id), _) => match parse_device_id(&device_id) {
            Ok(device_id) => ReadingFilter::Device(device_id),
            // No stored device can match, so the page is empty.
            Err(_) => return Ok(ListResponse::Ok(Json(ListBody::empty(page)))),
        },
        (None, Some(user_id)) => ReadingFilter::User(UserId::new(user_id)?),
        (None, None) => ReadingFilter::All,
    };

    let page = state.reading_service.list_readings(filter, page).await?;
    Ok(ListResponse::Ok(Json(ListBody {
        readings: page.items,
        pagination: page.pagination,
    })))
}

/// `POST /api/readings`
pub async fn create<DR, RR, PR>(
    State(state): State<AppState<DR, RR, PR>>,
    body: Result<Json<CreateReadingRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let reading = req.into_reading()?;
    let created = state.reading_service.create_reading(reading).await?;
    Ok(CreateResponse::Created(Json(created)))
}

//! JSON REST handler for device pairing verification.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use sensorhub_app::ports::{DeviceRepository, ReadingRepository, ReportRepository};
use sensorhub_app::services::device_service::Verification;
use sensorhub_domain::id::DeviceId;
use sensorhub_domain::time::Timestamp;

use super::required;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the verify endpoint.
#[derive(Deserialize)]
pub struct VerifyQuery {
    pub serial: Option<String>,
    pub code: Option<String>,
}

/// Device summary returned once pairing is confirmed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDevice {
    pub id: DeviceId,
    pub name: String,
    pub serial: String,
    pub last_seen: Timestamp,
}

/// Body of the verify response.
#[derive(Serialize)]
pub struct VerifyBody {
    pub verified: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<VerifiedDevice>,
}

impl From<Verification> for VerifyBody {
    fn from(value: Verification) -> Self {
        match value {
            Verification::UnknownDevice => Self {
                verified: false,
                message: "Device not found",
                device: None,
            },
            Verification::AwaitingData { .. } => Self {
                verified: false,
                message: "Device found but no recent data. Waiting for data...",
                device: None,
            },
            Verification::Verified { device, last_seen } => Self {
                verified: true,
                message: "Device verified successfully",
                device: Some(VerifiedDevice {
                    id: device.id,
                    name: device.name,
                    serial: device.serial,
                    last_seen,
                }),
            },
        }
    }
}

/// Possible responses from the verify endpoint.
pub enum VerifyResponse {
    /// Always 200, whether or not the device is verified.
    Ok(Json<VerifyBody>),
}

impl IntoResponse for VerifyResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/devices/verify?serial=&code=`
pub async fn verify<DR, RR, PR>(
    State(state): State<AppState<DR, RR, PR>>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<VerifyResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    let Query(params) = query?;
    let serial = required("serial", params.serial)?;
    let code = required("code", params.code)?;

    let outcome = state
        .device_service
        .verify_device(serial.trim(), &code)
        .await?;
    Ok(VerifyResponse::Ok(Json(outcome.into())))
}

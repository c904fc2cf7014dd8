//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod readings;
#[allow(clippy::missing_errors_doc)]
pub mod reports;

use std::str::FromStr;

use axum::Router;
use axum::routing::get;

use sensorhub_app::ports::{DeviceRepository, ReadingRepository, ReportRepository};
use sensorhub_domain::error::{NotFoundError, ValidationError};
use sensorhub_domain::id::DeviceId;
use sensorhub_domain::pagination::PageRequest;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<DR, RR, PR>() -> Router<AppState<DR, RR, PR>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    PR: ReportRepository + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route("/devices/verify", get(devices::verify::<DR, RR, PR>))
        // Readings
        .route("/readings/latest", get(readings::latest::<DR, RR, PR>))
        .route(
            "/readings",
            get(readings::list::<DR, RR, PR>).post(readings::create::<DR, RR, PR>),
        )
        // Reports
        .route(
            "/reports",
            get(reports::list::<DR, RR, PR>).post(reports::create::<DR, RR, PR>),
        )
}

/// Treat empty strings like absent values.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Require a query parameter to be present and non-empty.
fn required(name: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    non_empty(value).ok_or(ValidationError::MissingParameter(name))
}

/// Device ids are opaque to callers: one that cannot name a device is
/// reported as an unknown device.
fn parse_device_id(value: &str) -> Result<DeviceId, NotFoundError> {
    let value = value.trim();
    DeviceId::from_str(value).map_err(|_| NotFoundError {
        entity: "Device",
        id: value.to_owned(),
    })
}

fn parse_u32(
    field: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<u32, ValidationError> {
    match non_empty(value) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidInteger { field, value: raw }),
    }
}

/// Build a [`PageRequest`] from raw `limit`/`offset` query values.
fn page_request(
    limit: Option<String>,
    offset: Option<String>,
    default_limit: u32,
) -> Result<PageRequest, ValidationError> {
    Ok(PageRequest::new(
        parse_u32("limit", limit, default_limit)?,
        parse_u32("offset", offset, 0)?,
    ))
}

//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SensorHubError`] via `From`, so ports only ever return this type.

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum SensorHubError {
    /// Caller input is missing or malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// The storage collaborator failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons an input is rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required query parameter is absent or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// One or more required body fields are absent.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A pagination parameter is not a non-negative integer.
    #[error("invalid {field}: {value:?} is not a non-negative integer")]
    InvalidInteger { field: &'static str, value: String },

    /// A measurement is not a finite number.
    #[error("invalid {field}: {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },

    /// A timestamp is not valid RFC 3339.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A time range ends before it starts.
    #[error("invalid time range: `from` must not be after `to`")]
    InvalidTimeRange,

    /// A user id is empty.
    #[error("user id must not be empty")]
    EmptyUserId,

    /// A device serial is empty.
    #[error("device serial must not be empty")]
    EmptySerial,

    /// A report has no owner: none supplied and the device is unassigned.
    #[error("unable to resolve report owner: pass userId or assign the device to a user")]
    UnresolvedOwner,

    /// The request body could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record, e.g. `"Device"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

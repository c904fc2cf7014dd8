//! # sensorhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API under `/api` (`/api/devices/verify`,
//!   `/api/readings`, `/api/readings/latest`, `/api/reports`)
//! - Turn query strings and JSON bodies into validated domain values
//! - Map service results into JSON responses and status codes
//!
//! ## Dependency rule
//! Depends on `sensorhub-app` (for port traits and services) and
//! `sensorhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

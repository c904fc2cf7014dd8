//! # sensorhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository`: create and look up devices
//!   - `ReadingRepository`: append readings, fetch the latest, page through history
//!   - `ReportRepository`: append reports, page through a user's reports
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService`: pairing verification
//!   - `ReadingService`: latest reading, list, create
//!   - `ReportService`: list, create
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `sensorhub-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

//! # sensorhub-domain
//!
//! Pure domain model for the sensorhub environmental monitoring backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (air-quality sensors identified by a unique serial)
//! - Define **Readings** (one timestamped measurement uploaded by a device)
//! - Define **Reports** (user-requested session summaries over a time range)
//! - Define **pagination** metadata shared by every list endpoint
//! - Define **recency** rules used to classify data as live
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod pagination;
pub mod reading;
pub mod recency;
pub mod report;

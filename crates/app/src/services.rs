//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod device_service;
pub mod reading_service;
pub mod report_service;

#[cfg(test)]
pub(crate) mod memory;

#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for consensus demand-response markets.
///
/// This module contains the building blocks every market participant shares:
/// the breakpoints of a bid curve, the validated piecewise-linear curve that a
/// participant publishes, and the building-level bid curve that derives such a
/// curve from thermostat-setpoint and load flexibility.
///
/// The models are plain data with their evaluation rules attached. Validation
/// happens once, at construction, so that evaluation downstream is total.
pub mod models;

pub use models::*;

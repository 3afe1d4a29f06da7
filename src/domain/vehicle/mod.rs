//! Vehicle aggregate
//!
//! The closed set of vehicle kinds and their tax exemption.

pub mod model;

pub use model::{Vehicle, VehicleKind};

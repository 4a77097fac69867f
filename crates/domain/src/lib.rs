//! Domain layer for Precipitation Radial
//!
//! Forecast snapshots, their records, and the value objects that configure
//! how they are fetched and presented. No I/O lives here.

pub mod entities;
pub mod errors;
pub mod rounding;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

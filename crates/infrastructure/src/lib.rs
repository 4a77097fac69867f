//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Pirate Weather
//! forecast adapter, the filesystem card store and the JSON resource
//! registry. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, CardConfig, ConfigLoadError, PirateWeatherConfig, ServerConfig};
pub use telemetry::{TelemetryConfig, TelemetryError, init_tracing};

//! Value objects - immutable, validated configuration types

mod forecast_feed;
mod geo_location;
mod poll_interval;
mod unit_system;

pub use forecast_feed::ForecastFeed;
pub use geo_location::GeoLocation;
pub use poll_interval::PollInterval;
pub use unit_system::{Measurement, UnitSystem};

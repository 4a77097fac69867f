//! Pirate Weather integration
//!
//! Client for the Pirate Weather forecast API (<https://pirateweather.net>),
//! a Dark Sky compatible service with minute-level precipitation nowcasts.

pub mod client;
mod exclude;
mod models;

pub use client::{ClientConfig, FetchError, ForecastClient, ForecastQuery, PirateWeatherClient};
pub use exclude::{ExcludeSet, Section, Units};
pub use models::{ApiResponse, CurrentlyRecord, DataBlock, HourRecord, MinuteRecord};

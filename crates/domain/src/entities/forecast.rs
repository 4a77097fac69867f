//! Forecast snapshot entity
//!
//! A snapshot is the parsed result of one successful fetch. It is replaced
//! wholesale on the next successful fetch and never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of precipitation expected in a minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipType {
    /// Rain
    Rain,
    /// Snow
    Snow,
    /// Sleet
    Sleet,
    /// No precipitation, or an unrecognised type
    #[default]
    None,
}

impl PrecipType {
    /// Parse the API's precipitation type, falling back to `None`
    #[must_use]
    pub fn from_api(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("rain") => Self::Rain,
            Some("snow") => Self::Snow,
            Some("sleet") => Self::Sleet,
            _ => Self::None,
        }
    }

    /// Lowercase name as presented in sensor attributes
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Sleet => "sleet",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PrecipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One minute of the precipitation nowcast
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MinutePoint {
    /// Start of the minute (unix seconds)
    pub time: i64,
    /// Precipitation intensity in mm/h
    pub precip_intensity: f64,
    /// Probability of precipitation (0-1)
    pub precip_probability: f64,
    /// Standard deviation of the intensity
    pub precip_intensity_error: f64,
    /// Precipitation type
    pub precip_type: PrecipType,
}

/// One hour of the hourly forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourPoint {
    /// Start of the hour (unix seconds)
    pub time: i64,
    /// Icon name
    pub icon: String,
    /// Short text summary
    pub summary: String,
    /// Temperature in °C; `None` when the record carried none
    pub temperature: Option<f64>,
    /// Precipitation intensity in mm/h
    pub precip_intensity: f64,
    /// Probability of precipitation (0-1)
    pub precip_probability: f64,
}

/// Current observed conditions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in °C
    pub temperature: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
}

/// The latest parsed forecast payload held by one coordinator
///
/// Sections the coordinator asked for are always present (possibly empty);
/// sections it excluded are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    /// When the payload was fetched
    pub fetched_at: DateTime<Utc>,
    /// Minute-level precipitation
    pub minutely: Option<Vec<MinutePoint>>,
    /// Hourly forecast
    pub hourly: Option<Vec<HourPoint>>,
    /// Current conditions
    pub current: Option<CurrentConditions>,
}

impl ForecastSnapshot {
    /// Create an empty snapshot fetched at the given time
    #[must_use]
    pub const fn new(fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            minutely: None,
            hourly: None,
            current: None,
        }
    }

    /// Attach minute-level data
    #[must_use]
    pub fn with_minutely(mut self, points: Vec<MinutePoint>) -> Self {
        self.minutely = Some(points);
        self
    }

    /// Attach hourly data
    #[must_use]
    pub fn with_hourly(mut self, points: Vec<HourPoint>) -> Self {
        self.hourly = Some(points);
        self
    }

    /// Attach current conditions
    #[must_use]
    pub fn with_current(mut self, current: CurrentConditions) -> Self {
        self.current = Some(current);
        self
    }

    /// Minute points, empty when the section was not fetched
    #[must_use]
    pub fn minute_points(&self) -> &[MinutePoint] {
        self.minutely.as_deref().unwrap_or_default()
    }

    /// Hour points, empty when the section was not fetched
    #[must_use]
    pub fn hour_points(&self) -> &[HourPoint] {
        self.hourly.as_deref().unwrap_or_default()
    }

    /// Finite temperatures of hour points starting in `[start, end)` (unix seconds)
    pub fn temperatures_between(&self, start: i64, end: i64) -> impl Iterator<Item = f64> + '_ {
        self.hour_points()
            .iter()
            .filter(move |point| (start..end).contains(&point.time))
            .filter_map(|point| point.temperature)
            .filter(|temperature| temperature.is_finite())
    }
}

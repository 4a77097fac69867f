//! Presentation unit system
//!
//! Forecasts are always fetched in SI units (°C, m/s). The unit system only
//! decides how values are presented.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Kind of physical quantity a sensor presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    /// Air temperature
    Temperature,
    /// Wind speed
    WindSpeed,
}

/// Units used when presenting sensor values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// °C and m/s, as fetched
    #[default]
    Metric,
    /// °F and mph
    Imperial,
}

const MPS_TO_MPH: f64 = 2.236_936_292_054_402;

impl UnitSystem {
    /// Convert an SI value of the given measurement into this unit system
    #[must_use]
    pub fn convert(self, measurement: Measurement, si_value: f64) -> f64 {
        match (self, measurement) {
            (Self::Metric, _) => si_value,
            (Self::Imperial, Measurement::Temperature) => si_value.mul_add(9.0 / 5.0, 32.0),
            (Self::Imperial, Measurement::WindSpeed) => si_value * MPS_TO_MPH,
        }
    }

    /// Unit label for a measurement in this unit system
    #[must_use]
    pub const fn unit_of(self, measurement: Measurement) -> &'static str {
        match (self, measurement) {
            (Self::Metric, Measurement::Temperature) => "°C",
            (Self::Imperial, Measurement::Temperature) => "°F",
            (Self::Metric, Measurement::WindSpeed) => "m/s",
            (Self::Imperial, Measurement::WindSpeed) => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(Self::Metric),
            "imperial" | "us" => Ok(Self::Imperial),
            _ => Err(DomainError::InvalidUnitSystem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_is_identity() {
        assert!((UnitSystem::Metric.convert(Measurement::Temperature, 15.0) - 15.0).abs() < 1e-9);
        assert!((UnitSystem::Metric.convert(Measurement::WindSpeed, 3.2) - 3.2).abs() < 1e-9);
    }

    #[test]
    fn imperial_temperature() {
        let f = UnitSystem::Imperial.convert(Measurement::Temperature, 100.0);
        assert!((f - 212.0).abs() < 1e-9);
        let f = UnitSystem::Imperial.convert(Measurement::Temperature, -40.0);
        assert!((f + 40.0).abs() < 1e-9);
    }

    #[test]
    fn imperial_wind_speed() {
        let mph = UnitSystem::Imperial.convert(Measurement::WindSpeed, 10.0);
        assert!((mph - 22.369_362_920_544_02).abs() < 1e-9);
    }

    #[test]
    fn unit_labels() {
        assert_eq!(UnitSystem::Metric.unit_of(Measurement::Temperature), "°C");
        assert_eq!(UnitSystem::Imperial.unit_of(Measurement::Temperature), "°F");
        assert_eq!(UnitSystem::Metric.unit_of(Measurement::WindSpeed), "m/s");
        assert_eq!(UnitSystem::Imperial.unit_of(Measurement::WindSpeed), "mph");
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("metric".parse::<UnitSystem>().ok(), Some(UnitSystem::Metric));
        assert_eq!("Imperial".parse::<UnitSystem>().ok(), Some(UnitSystem::Imperial));
        assert!("kelvin".parse::<UnitSystem>().is_err());
        assert_eq!(UnitSystem::Imperial.to_string(), "imperial");
    }

    #[test]
    fn default_is_metric() {
        assert_eq!(UnitSystem::default(), UnitSystem::Metric);
    }
}

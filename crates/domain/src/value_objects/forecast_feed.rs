//! Forecast feed selection
//!
//! A feed names which sections of the forecast payload a fetch needs. The
//! remaining sections are excluded from the request to keep responses small.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which forecast sections a fetch asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastFeed {
    /// Minute-level precipitation only
    Minutely,
    /// Current conditions plus hourly forecast
    Hourly,
    /// Current conditions only, used to check credentials
    Validation,
}

impl ForecastFeed {
    /// Whether the minutely section is requested
    #[must_use]
    pub const fn wants_minutely(self) -> bool {
        matches!(self, Self::Minutely)
    }

    /// Whether the hourly section is requested
    #[must_use]
    pub const fn wants_hourly(self) -> bool {
        matches!(self, Self::Hourly)
    }

    /// Whether current conditions are requested
    #[must_use]
    pub const fn wants_currently(self) -> bool {
        matches!(self, Self::Hourly | Self::Validation)
    }

    /// Request timeout used for this feed
    ///
    /// Credential checks are interactive and give up sooner than polls.
    #[must_use]
    pub const fn timeout(self) -> Duration {
        match self {
            Self::Validation => Duration::from_secs(15),
            Self::Minutely | Self::Hourly => Duration::from_secs(30),
        }
    }
}

impl fmt::Display for ForecastFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutely => write!(f, "minutely"),
            Self::Hourly => write!(f, "hourly"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutely_wants_only_minutely() {
        let feed = ForecastFeed::Minutely;
        assert!(feed.wants_minutely());
        assert!(!feed.wants_hourly());
        assert!(!feed.wants_currently());
    }

    #[test]
    fn hourly_wants_hourly_and_currently() {
        let feed = ForecastFeed::Hourly;
        assert!(!feed.wants_minutely());
        assert!(feed.wants_hourly());
        assert!(feed.wants_currently());
    }

    #[test]
    fn validation_wants_currently() {
        let feed = ForecastFeed::Validation;
        assert!(!feed.wants_minutely());
        assert!(!feed.wants_hourly());
        assert!(feed.wants_currently());
    }

    #[test]
    fn timeouts() {
        assert_eq!(ForecastFeed::Validation.timeout(), Duration::from_secs(15));
        assert_eq!(ForecastFeed::Minutely.timeout(), Duration::from_secs(30));
        assert_eq!(ForecastFeed::Hourly.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn display() {
        assert_eq!(ForecastFeed::Minutely.to_string(), "minutely");
        assert_eq!(ForecastFeed::Hourly.to_string(), "hourly");
    }
}

//! Poll interval value object
//!
//! Each coordinator refreshes on a fixed interval whose allowed range
//! depends on the feed it polls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::DomainError;

/// A validated polling interval in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PollInterval(u64);

impl PollInterval {
    /// Allowed minutely interval range in seconds
    pub const MINUTELY_RANGE: (u64, u64) = (60, 3600);
    /// Allowed hourly interval range in seconds
    pub const HOURLY_RANGE: (u64, u64) = (300, 7200);
    /// Default minutely interval in seconds
    pub const DEFAULT_MINUTELY_SECS: u64 = 300;
    /// Default hourly interval in seconds
    pub const DEFAULT_HOURLY_SECS: u64 = 1200;

    /// Default minutely interval (5 minutes)
    #[must_use]
    pub const fn default_minutely() -> Self {
        Self(Self::DEFAULT_MINUTELY_SECS)
    }

    /// Default hourly interval (20 minutes)
    #[must_use]
    pub const fn default_hourly() -> Self {
        Self(Self::DEFAULT_HOURLY_SECS)
    }

    /// Create a validated minutely interval
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInterval` outside 60-3600 seconds.
    pub fn minutely(secs: u64) -> Result<Self, DomainError> {
        Self::checked("minutely", secs, Self::MINUTELY_RANGE)
    }

    /// Create a validated hourly interval
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInterval` outside 300-7200 seconds.
    pub fn hourly(secs: u64) -> Result<Self, DomainError> {
        Self::checked("hourly", secs, Self::HOURLY_RANGE)
    }

    fn checked(feed: &'static str, secs: u64, (min, max): (u64, u64)) -> Result<Self, DomainError> {
        if (min..=max).contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(DomainError::InvalidInterval {
                feed,
                secs,
                min,
                max,
            })
        }
    }

    /// Interval in seconds
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Interval as a `Duration`
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

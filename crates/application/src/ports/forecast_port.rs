//! Forecast service port
//!
//! Defines the interface for fetching forecast snapshots.

use async_trait::async_trait;
use domain::{ForecastFeed, ForecastSnapshot, GeoLocation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forecast retrieval
///
/// Implementations must return a snapshot that is structurally complete for
/// the feed: every section the feed wants is present (possibly empty), and
/// missing record fields are already defaulted.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Fetch the sections of `feed` for a location
    ///
    /// Fails with `InvalidCredentials` on HTTP 403, `ConnectionFailure` on
    /// transport errors and other statuses, `MalformedResponse` when the body
    /// is not a forecast.
    async fn fetch(
        &self,
        location: &GeoLocation,
        feed: ForecastFeed,
    ) -> Result<ForecastSnapshot, ApplicationError>;
}

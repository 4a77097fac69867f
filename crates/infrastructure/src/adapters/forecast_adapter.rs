//! Forecast adapter - Implements ForecastPort using integration_pirateweather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::ForecastPort;
use async_trait::async_trait;
use chrono::Utc;
use domain::{
    CurrentConditions, ForecastFeed, ForecastSnapshot, GeoLocation, HourPoint, MinutePoint,
    PrecipType,
};
use integration_pirateweather::{
    ApiResponse, ClientConfig, CurrentlyRecord, ExcludeSet, FetchError, ForecastClient,
    ForecastQuery, HourRecord, MinuteRecord, PirateWeatherClient, Section, Units,
};
use tracing::{debug, instrument};

/// Adapter for the Pirate Weather forecast API
pub struct PirateWeatherAdapter {
    client: Arc<dyn ForecastClient>,
}

impl std::fmt::Debug for PirateWeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PirateWeatherAdapter")
            .field("client", &"PirateWeatherClient")
            .finish()
    }
}

impl PirateWeatherAdapter {
    /// Create an adapter with the given client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: ClientConfig) -> Result<Self, ApplicationError> {
        let client =
            PirateWeatherClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wrap an existing client
    pub fn with_client(client: Arc<dyn ForecastClient>) -> Self {
        Self { client }
    }

    /// Sections to leave out of the request for a feed
    fn exclusions(feed: ForecastFeed) -> ExcludeSet {
        let mut keep = Vec::with_capacity(2);
        if feed.wants_currently() {
            keep.push(Section::Currently);
        }
        if feed.wants_minutely() {
            keep.push(Section::Minutely);
        }
        if feed.wants_hourly() {
            keep.push(Section::Hourly);
        }
        ExcludeSet::all_except(&keep)
    }

    /// Map integration fetch error to application error
    fn map_error(err: FetchError) -> ApplicationError {
        match err {
            FetchError::InvalidCredentials => ApplicationError::InvalidCredentials,
            FetchError::HttpStatus(status) => {
                ApplicationError::ConnectionFailure(format!("API returned HTTP {status}"))
            },
            FetchError::FetchFailed(e) => ApplicationError::ConnectionFailure(e),
            FetchError::MalformedResponse(e) => ApplicationError::MalformedResponse(e),
        }
    }

    fn map_minute(record: MinuteRecord) -> MinutePoint {
        MinutePoint {
            time: record.time.unwrap_or_default(),
            precip_intensity: record.precip_intensity.unwrap_or_default(),
            precip_probability: record.precip_probability.unwrap_or_default(),
            precip_intensity_error: record.precip_intensity_error.unwrap_or_default(),
            precip_type: PrecipType::from_api(record.precip_type.as_deref()),
        }
    }

    fn map_hour(record: HourRecord) -> HourPoint {
        HourPoint {
            time: record.time.unwrap_or_default(),
            icon: record.icon.unwrap_or_default(),
            summary: record.summary.unwrap_or_default(),
            temperature: record.temperature,
            precip_intensity: record.precip_intensity.unwrap_or_default(),
            precip_probability: record.precip_probability.unwrap_or_default(),
        }
    }

    const fn map_current(record: &CurrentlyRecord) -> CurrentConditions {
        CurrentConditions {
            temperature: record.temperature,
            wind_speed: record.wind_speed,
        }
    }

    /// Build a snapshot holding every section the feed wants
    ///
    /// A wanted section missing from the payload becomes empty.
    fn to_snapshot(feed: ForecastFeed, response: ApiResponse) -> ForecastSnapshot {
        let mut snapshot = ForecastSnapshot::new(Utc::now());
        if feed.wants_minutely() {
            let points = response
                .minutely
                .map(|block| block.data.into_iter().map(Self::map_minute).collect())
                .unwrap_or_default();
            snapshot = snapshot.with_minutely(points);
        }
        if feed.wants_hourly() {
            let points = response
                .hourly
                .map(|block| block.data.into_iter().map(Self::map_hour).collect())
                .unwrap_or_default();
            snapshot = snapshot.with_hourly(points);
        }
        if feed.wants_currently() {
            let current = response
                .currently
                .as_ref()
                .map(Self::map_current)
                .unwrap_or_default();
            snapshot = snapshot.with_current(current);
        }
        snapshot
    }
}

#[async_trait]
impl ForecastPort for PirateWeatherAdapter {
    #[instrument(skip_all, fields(location = %location, feed = %feed))]
    async fn fetch(
        &self,
        location: &GeoLocation,
        feed: ForecastFeed,
    ) -> Result<ForecastSnapshot, ApplicationError> {
        let query = ForecastQuery {
            latitude: location.latitude(),
            longitude: location.longitude(),
            exclude: Self::exclusions(feed),
            units: Units::Si,
            timeout: feed.timeout(),
        };

        let response = self.client.fetch(&query).await.map_err(Self::map_error)?;
        let snapshot = Self::to_snapshot(feed, response);
        debug!(
            minutes = snapshot.minute_points().len(),
            hours = snapshot.hour_points().len(),
            "Forecast mapped"
        );
        Ok(snapshot)
    }
}

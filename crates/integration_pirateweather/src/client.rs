//! Pirate Weather client
//!
//! HTTP client for the Pirate Weather forecast API. Credentials and
//! coordinates travel in the request path:
//! `{base_url}/{api_key}/{lat},{lon}?exclude={csv}&units={units}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::exclude::{ExcludeSet, Units};
use crate::models::ApiResponse;

/// Forecast client errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API rejected the key (HTTP 403)
    #[error("Invalid API key")]
    InvalidCredentials,

    /// The API answered with a status other than 200
    #[error("API returned HTTP {0}")]
    HttpStatus(u16),

    /// The request could not be completed (connect, timeout, body read)
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The body was not a JSON forecast object
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Whether the error means the credentials are wrong
    #[must_use]
    pub const fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (default: <https://api.pirateweather.net/forecast>)
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
    /// User agent sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Default API base URL
    pub const DEFAULT_BASE_URL: &'static str = "https://api.pirateweather.net/forecast";

    /// Configuration for the public endpoint with the given key
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key,
            user_agent: concat!("precipitation-radial/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Parameters of a single forecast request
#[derive(Debug, Clone)]
pub struct ForecastQuery {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Sections to leave out of the response
    pub exclude: ExcludeSet,
    /// Unit system of the response
    pub units: Units,
    /// Timeout for the whole request
    pub timeout: Duration,
}

/// Forecast client trait for fetching forecast payloads
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Fetch and parse one forecast payload
    async fn fetch(&self, query: &ForecastQuery) -> Result<ApiResponse, FetchError>;
}

/// Pirate Weather HTTP client implementation
#[derive(Debug)]
pub struct PirateWeatherClient {
    client: Client,
    config: ClientConfig,
}

impl PirateWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::FetchFailed(e.without_url().to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the request URL
    fn build_url(&self, query: &ForecastQuery, api_key: &str) -> String {
        let mut url = format!(
            "{}/{}/{},{}?",
            self.config.base_url.trim_end_matches('/'),
            api_key,
            query.latitude,
            query.longitude,
        );
        if !query.exclude.is_empty() {
            url.push_str("exclude=");
            url.push_str(&query.exclude.to_query_value());
            url.push('&');
        }
        url.push_str("units=");
        url.push_str(query.units.as_str());
        url
    }

    /// URL safe to log: the API key is masked
    fn redacted_url(&self, query: &ForecastQuery) -> String {
        self.build_url(query, "***")
    }

    /// Map a non-success status to an error
    fn check_status(status: StatusCode) -> Result<(), FetchError> {
        match status {
            StatusCode::OK => Ok(()),
            StatusCode::FORBIDDEN => Err(FetchError::InvalidCredentials),
            other => Err(FetchError::HttpStatus(other.as_u16())),
        }
    }
}

#[async_trait]
impl ForecastClient for PirateWeatherClient {
    #[instrument(skip(self, query), fields(lat = %query.latitude, lon = %query.longitude, exclude = %query.exclude))]
    async fn fetch(&self, query: &ForecastQuery) -> Result<ApiResponse, FetchError> {
        let url = self.build_url(query, self.config.api_key.expose_secret());
        debug!(url = %self.redacted_url(query), "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .timeout(query.timeout)
            .send()
            .await
            .map_err(|e| FetchError::FetchFailed(e.without_url().to_string()))?;

        let status = response.status();
        if let Err(e) = Self::check_status(status) {
            warn!(status = status.as_u16(), "Forecast request rejected");
            return Err(e);
        }

        // Parse from bytes so the content type is not enforced.
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::FetchFailed(e.without_url().to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

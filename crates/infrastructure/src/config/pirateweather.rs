//! Pirate Weather feed configuration.

use domain::{PollInterval, UnitSystem};
use integration_pirateweather::ClientConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Forecast API credentials, location and polling settings
#[derive(Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_api_key"))]
pub struct PirateWeatherConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(skip_serializing, default = "empty_secret")]
    pub api_key: SecretString,

    /// API base URL
    #[serde(default = "default_base_url")]
    #[validate(custom(function = "validate_base_url"))]
    pub base_url: String,

    /// Latitude (-90.0 to 90.0)
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    /// Longitude (-180.0 to 180.0)
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Minute-level refresh interval in seconds (60-3600)
    #[serde(default = "default_minutely_interval")]
    #[validate(range(min = 60, max = 3600))]
    pub minutely_interval_secs: u64,

    /// Hourly refresh interval in seconds (300-7200)
    #[serde(default = "default_hourly_interval")]
    #[validate(range(min = 300, max = 7200))]
    pub hourly_interval_secs: u64,

    /// Units sensor values are presented in
    #[serde(default)]
    pub unit_system: UnitSystem,

    /// Display name passed to the minutely forecast attributes
    #[serde(default)]
    pub location_name: String,

    /// Installation identifier; derived from the coordinates when unset
    #[serde(default)]
    pub entry_id: Option<String>,
}

impl std::fmt::Debug for PirateWeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PirateWeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("minutely_interval_secs", &self.minutely_interval_secs)
            .field("hourly_interval_secs", &self.hourly_interval_secs)
            .field("unit_system", &self.unit_system)
            .field("location_name", &self.location_name)
            .field("entry_id", &self.entry_id)
            .finish()
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_base_url() -> String {
    ClientConfig::DEFAULT_BASE_URL.to_string()
}

const fn default_minutely_interval() -> u64 {
    PollInterval::DEFAULT_MINUTELY_SECS
}

const fn default_hourly_interval() -> u64 {
    PollInterval::DEFAULT_HOURLY_SECS
}

fn validate_api_key(config: &PirateWeatherConfig) -> Result<(), ValidationError> {
    if config.api_key.expose_secret().trim().is_empty() {
        return Err(ValidationError::new("api_key_missing"));
    }
    Ok(())
}

fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("base_url_scheme"))
    }
}

impl Default for PirateWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: empty_secret(),
            base_url: default_base_url(),
            latitude: 0.0,
            longitude: 0.0,
            minutely_interval_secs: default_minutely_interval(),
            hourly_interval_secs: default_hourly_interval(),
            unit_system: UnitSystem::default(),
            location_name: String::new(),
            entry_id: None,
        }
    }
}

impl PirateWeatherConfig {
    /// Convert to `integration_pirateweather`'s `ClientConfig`
    #[must_use]
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::new(SecretString::from(self.api_key.expose_secret().to_string()))
            .with_base_url(self.base_url.clone())
    }
}

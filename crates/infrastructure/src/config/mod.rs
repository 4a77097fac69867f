//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `pirateweather`: API key, location and polling intervals
//! - `card`: dashboard card asset and resource store
//!
//! Sources, later ones winning:
//! 1. `config.toml` in the working directory, or an explicit file
//! 2. Environment variables such as `PRECIPITATION_RADIAL_PIRATEWEATHER__API_KEY`

mod card;
mod pirateweather;
mod server;

use std::path::Path;

use application::ConfigEntry;
use domain::{DomainError, GeoLocation, PollInterval};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::telemetry::TelemetryConfig;

pub use card::CardConfig;
pub use pirateweather::PirateWeatherConfig;
pub use server::ServerConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PRECIPITATION_RADIAL";
/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "PRECIPITATION_RADIAL_CONFIG";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// A value is out of range or missing
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// The values do not form a valid entry
    #[error("Invalid configuration: {0}")]
    Domain(#[from] DomainError),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Forecast feed configuration
    #[serde(default)]
    #[validate(nested)]
    pub pirateweather: PirateWeatherConfig,

    /// Dashboard card configuration
    #[serde(default)]
    #[validate(nested)]
    pub card: CardConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from an explicit file (required) or `config.toml`
    /// (optional), then environment variables, and validate the result
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            // e.g. PRECIPITATION_RADIAL_SERVER__PORT=8080
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Build the installation entry described by this configuration
    pub fn config_entry(&self) -> Result<ConfigEntry, ConfigLoadError> {
        let pw = &self.pirateweather;
        let location = GeoLocation::new(pw.latitude, pw.longitude)?;
        let mut entry = ConfigEntry::new(location)
            .with_intervals(
                PollInterval::minutely(pw.minutely_interval_secs)?,
                PollInterval::hourly(pw.hourly_interval_secs)?,
            )
            .with_unit_system(pw.unit_system)
            .with_location_name(pw.location_name.clone());
        if let Some(entry_id) = pw.entry_id.as_deref().filter(|id| !id.trim().is_empty()) {
            entry = entry.with_entry_id(entry_id);
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::UnitSystem;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.pirateweather.api_key = "key".to_string().into();
        config.pirateweather.latitude = 45.5;
        config.pirateweather.longitude = -122.5;
        config
    }

    #[test]
    fn loads_toml_file() {
        let file = write_config(
            r#"
            [server]
            port = 8099

            [pirateweather]
            api_key = "abc123"
            latitude = 45.5
            longitude = -122.5
            minutely_interval_secs = 120
            unit_system = "imperial"
            location_name = "Portland"
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).expect("load");

        assert_eq!(config.server.port, 8099);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.pirateweather.api_key.expose_secret(), "abc123");
        assert_eq!(config.pirateweather.minutely_interval_secs, 120);
        assert_eq!(config.pirateweather.hourly_interval_secs, 1200);
        assert_eq!(config.pirateweather.unit_system, UnitSystem::Imperial);
        assert!(config.card.enabled);
    }

    #[test]
    fn rejects_out_of_range_interval() {
        let file = write_config(
            r#"
            [pirateweather]
            api_key = "abc123"
            minutely_interval_secs = 30
            "#,
        );

        let err = AppConfig::load_from(Some(file.path())).expect_err("invalid");
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
    }

    #[test]
    fn file_without_api_key_is_rejected() {
        let file = write_config(
            r#"
            [pirateweather]
            latitude = 45.5
            longitude = -122.5
            "#,
        );

        let err = AppConfig::load_from(Some(file.path())).expect_err("no key");
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load_from(Some(Path::new("/nonexistent/precip.toml")))
            .expect_err("missing file");
        assert!(matches!(err, ConfigLoadError::Source(_)));
    }

    #[test]
    fn validation_requires_api_key() {
        let mut config = valid();
        assert!(config.validate().is_ok());
        config.pirateweather.api_key = String::new().into();
        assert!(config.validate().is_err());
        config.pirateweather.api_key = "   ".to_string().into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_checks_coordinates() {
        let mut config = valid();
        config.pirateweather.latitude = 91.0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.pirateweather.longitude = -180.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_checks_base_url_scheme() {
        let mut config = valid();
        config.pirateweather.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_entry_uses_derived_id() {
        let entry = valid().config_entry().expect("entry");
        assert_eq!(entry.entry_id, "precipitation_radial_45.5_-122.5");
        assert_eq!(entry.minutely_interval.as_secs(), 300);
        assert_eq!(entry.hourly_interval.as_secs(), 1200);
    }

    #[test]
    fn config_entry_honours_explicit_id() {
        let mut config = valid();
        config.pirateweather.entry_id = Some("home".into());
        assert_eq!(config.config_entry().expect("entry").entry_id, "home");

        config.pirateweather.entry_id = Some("  ".into());
        assert_eq!(
            config.config_entry().expect("entry").entry_id,
            "precipitation_radial_45.5_-122.5"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", valid());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("\"key\""));
    }

    #[test]
    fn client_config_carries_key_and_url() {
        let mut config = valid();
        config.pirateweather.base_url = "http://localhost:9999/forecast".into();
        let client = config.pirateweather.to_client_config();
        assert_eq!(client.base_url, "http://localhost:9999/forecast");
        assert_eq!(client.api_key.expose_secret(), "key");
    }
}

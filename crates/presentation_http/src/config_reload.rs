//! Hot-reloadable configuration support
//!
//! SIGHUP re-reads the configuration and rebuilds the installation from it.
//! Either step failing leaves the running configuration and installation
//! in place.
//!
//! The `/local` static route stays bound to the `www_dir` the server started
//! with; a changed `card.www_dir` takes effect on restart.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use arc_swap::ArcSwap;
use infrastructure::{AppConfig, ConfigLoadError};
use tracing::{error, info, warn};

use crate::host::{IntegrationHost, build_service};

/// A wrapper around `AppConfig` that supports atomic reload
#[derive(Debug, Clone)]
pub struct ReloadableConfig {
    inner: Arc<ArcSwap<AppConfig>>,
    /// Explicit file the configuration came from
    path: Option<PathBuf>,
}

impl ReloadableConfig {
    #[must_use]
    pub fn new(config: AppConfig, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::new(Arc::new(config))),
            path,
        }
    }

    /// Get the current configuration
    #[must_use]
    pub fn load(&self) -> Arc<AppConfig> {
        self.inner.load_full()
    }

    /// Re-read the configuration sources without applying them
    pub fn read_sources(&self) -> Result<AppConfig, ConfigLoadError> {
        AppConfig::load_from(self.path.as_deref())
    }

    /// Make `config` the current configuration
    pub fn commit(&self, config: Arc<AppConfig>) {
        let old = self.inner.swap(Arc::clone(&config));
        info!(
            old_latitude = old.pirateweather.latitude,
            old_longitude = old.pirateweather.longitude,
            latitude = config.pirateweather.latitude,
            longitude = config.pirateweather.longitude,
            "Configuration reloaded"
        );
    }
}

/// Reload the configuration and install a fresh installation built from it
///
/// The new configuration becomes current only once its installation is
/// running.
pub async fn reload_installation(
    config: &ReloadableConfig,
    host: &IntegrationHost,
) -> anyhow::Result<()> {
    let loaded = Arc::new(config.read_sources().context("configuration reload failed")?);

    let entry = loaded.config_entry().context("installation rebuild failed")?;
    let service = build_service(&loaded).context("installation rebuild failed")?;
    host.install(&service, &entry)
        .await
        .context("installation rebuild failed")?;

    let previous = config.load();
    if previous.card.www_dir != loaded.card.www_dir {
        warn!(
            served = %previous.card.www_dir.display(),
            configured = %loaded.card.www_dir.display(),
            "card.www_dir changed; /local keeps serving the old directory until restart"
        );
    }
    config.commit(loaded);
    Ok(())
}

/// Spawn a background task that rebuilds the installation on SIGHUP
#[cfg(unix)]
pub fn spawn_config_reload_handler(
    config: ReloadableConfig,
    host: Arc<IntegrationHost>,
) -> ReloadableConfig {
    use tokio::signal::unix::{SignalKind, signal};

    let handle = config.clone();
    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Failed to install SIGHUP handler");
                return;
            },
        };

        while sighup.recv().await.is_some() {
            info!("Received SIGHUP, reloading configuration");
            match reload_installation(&handle, &host).await {
                Ok(()) => info!("Reload complete"),
                Err(e) => warn!(error = %format!("{e:#}"), "Reload failed, keeping previous installation"),
            }
        }
    });

    config
}

/// No-op on non-Unix systems
#[cfg(not(unix))]
pub fn spawn_config_reload_handler(
    config: ReloadableConfig,
    _host: Arc<IntegrationHost>,
) -> ReloadableConfig {
    warn!("SIGHUP config reload not supported on this platform");
    config
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    fn config_toml(base_url: &str, latitude: f64) -> String {
        format!(
            r#"
            [pirateweather]
            api_key = "key"
            base_url = "{base_url}"
            latitude = {latitude}
            longitude = -122.5

            [card]
            enabled = false
            "#
        )
    }

    async fn forecast_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "currently": { "temperature": 10.0 },
                "minutely": { "data": [] },
                "hourly": { "data": [] }
            })))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn load_returns_current() {
        let mut config = AppConfig::default();
        config.server.port = 8080;
        let reloadable = ReloadableConfig::new(config, None);
        assert_eq!(reloadable.load().server.port, 8080);
    }

    #[test]
    fn read_sources_does_not_apply() {
        let file = write_config(&config_toml("http://localhost:1/forecast", 40.0));
        let reloadable = ReloadableConfig::new(AppConfig::default(), Some(file.path().into()));

        let loaded = reloadable.read_sources().expect("read");

        assert!((loaded.pirateweather.latitude - 40.0).abs() < f64::EPSILON);
        assert!(reloadable.load().pirateweather.latitude.abs() < f64::EPSILON);

        reloadable.commit(Arc::new(loaded));
        assert!((reloadable.load().pirateweather.latitude - 40.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unreadable_file_keeps_previous() {
        let mut config = AppConfig::default();
        config.server.port = 8080;
        let reloadable =
            ReloadableConfig::new(config, Some(PathBuf::from("/nonexistent/precip.toml")));
        let host = IntegrationHost::new();

        assert!(reload_installation(&reloadable, &host).await.is_err());
        assert_eq!(reloadable.load().server.port, 8080);
        assert!(host.current().is_none());
    }

    #[tokio::test]
    async fn reload_rebuilds_installation() {
        let server = forecast_server().await;
        let base_url = format!("{}/forecast", server.uri());
        let file = write_config(&config_toml(&base_url, 40.0));
        let reloadable = ReloadableConfig::new(AppConfig::default(), Some(file.path().into()));
        let host = IntegrationHost::new();

        reload_installation(&reloadable, &host).await.expect("reload");

        assert!((reloadable.load().pirateweather.latitude - 40.0).abs() < f64::EPSILON);
        let installation = host.current().expect("installed");
        assert_eq!(installation.entry().entry_id, "precipitation_radial_40.0_-122.5");
        host.shutdown().await;
    }

    #[tokio::test]
    async fn changed_www_dir_is_committed_without_rebinding() {
        let server = forecast_server().await;
        let base_url = format!("{}/forecast", server.uri());
        let contents = config_toml(&base_url, 40.0).replace(
            "enabled = false",
            "enabled = false\n            www_dir = \"/srv/precip-www\"",
        );
        let file = write_config(&contents);
        let reloadable = ReloadableConfig::new(AppConfig::default(), Some(file.path().into()));
        let host = IntegrationHost::new();

        reload_installation(&reloadable, &host).await.expect("reload");

        assert_eq!(
            reloadable.load().card.www_dir,
            PathBuf::from("/srv/precip-www")
        );
        host.shutdown().await;
    }

    #[tokio::test]
    async fn failed_rebuild_restores_previous_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let file = write_config(&config_toml(&format!("{}/forecast", server.uri()), 40.0));
        let mut initial = AppConfig::default();
        initial.pirateweather.latitude = 12.0;
        let reloadable = ReloadableConfig::new(initial, Some(file.path().into()));
        let host = IntegrationHost::new();

        assert!(reload_installation(&reloadable, &host).await.is_err());
        assert!(host.current().is_none());
        assert!((reloadable.load().pirateweather.latitude - 12.0).abs() < f64::EPSILON);
    }
}

//! Holder of the running installation
//!
//! Exactly one installation serves requests at a time. Installing a new one
//! sets it up completely before swapping it in, so a failed reload leaves
//! the previous installation running.

use std::sync::Arc;

use application::{
    ApplicationError, AssetRegistrar, ConfigEntry, Installation, IntegrationService,
    RegistrationState,
};
use arc_swap::ArcSwapOption;
use infrastructure::{AppConfig, CardConfig, FsAssetStore, JsonResourceStore, PirateWeatherAdapter};
use tokio::sync::Mutex;
use tracing::info;

/// Build the integration service described by a configuration
pub fn build_service(config: &AppConfig) -> Result<IntegrationService, ApplicationError> {
    let adapter = PirateWeatherAdapter::new(config.pirateweather.to_client_config())?;
    let service = IntegrationService::new(Arc::new(adapter));
    Ok(if config.card.enabled {
        service.with_registrar(card_registrar(&config.card))
    } else {
        service
    })
}

/// Card registrar backed by the local www directory and resource file
pub fn card_registrar(card: &CardConfig) -> AssetRegistrar {
    AssetRegistrar::new(
        Arc::new(FsAssetStore::new(&card.source_path, &card.www_dir)),
        Arc::new(JsonResourceStore::new(&card.resources_file)),
    )
}

#[derive(Debug, Default)]
pub struct IntegrationHost {
    current: ArcSwapOption<Installation>,
    registration: RegistrationState,
    // serializes installs so two reloads never race each other
    install_lock: Mutex<()>,
}

impl IntegrationHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The installation currently serving, if any
    pub fn current(&self) -> Option<Arc<Installation>> {
        self.current.load_full()
    }

    pub fn registration(&self) -> &RegistrationState {
        &self.registration
    }

    /// Set up `entry` and replace the running installation with it
    ///
    /// On error nothing is replaced.
    pub async fn install(
        &self,
        service: &IntegrationService,
        entry: &ConfigEntry,
    ) -> Result<Arc<Installation>, ApplicationError> {
        let _guard = self.install_lock.lock().await;
        let installation = Arc::new(service.setup(entry, &self.registration).await?);
        if let Some(previous) = self.current.swap(Some(Arc::clone(&installation))) {
            info!(entry_id = %previous.entry().entry_id, "Replacing running installation");
            previous.shutdown().await;
        }
        Ok(installation)
    }

    /// Unload the running installation and wait for its timers to stop
    pub async fn shutdown(&self) {
        let _guard = self.install_lock.lock().await;
        if let Some(installation) = self.current.swap(None) {
            installation.shutdown().await;
        }
    }
}

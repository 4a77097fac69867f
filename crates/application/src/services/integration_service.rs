//! Installation lifecycle
//!
//! Setting up an entry registers the card (once per process), builds both
//! coordinators, runs their mandatory first refresh, starts their timers and
//! creates the sensor entities. Any first-refresh failure aborts setup
//! before a timer or sensor exists.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use domain::{ForecastFeed, GeoLocation, PollInterval, UnitSystem};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use super::asset_registrar::{AssetRegistrar, RegistrationState};
use super::coordinator::{Coordinator, CoordinatorStatus};
use super::sensors::{SENSOR_DESCRIPTORS, SensorContext, SensorEntity, SensorState};
use crate::error::ApplicationError;
use crate::ports::ForecastPort;

/// Settings of one configured location
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    /// Stable per-installation identifier, prefix of every sensor id
    pub entry_id: String,
    pub location: GeoLocation,
    pub minutely_interval: PollInterval,
    pub hourly_interval: PollInterval,
    pub unit_system: UnitSystem,
    pub location_name: String,
}

impl ConfigEntry {
    /// Entry with default intervals, metric units and an id derived from
    /// the coordinates
    pub fn new(location: GeoLocation) -> Self {
        Self {
            entry_id: location.installation_id(),
            location,
            minutely_interval: PollInterval::default_minutely(),
            hourly_interval: PollInterval::default_hourly(),
            unit_system: UnitSystem::default(),
            location_name: String::new(),
        }
    }

    #[must_use]
    pub fn with_entry_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = entry_id.into();
        self
    }

    #[must_use]
    pub fn with_intervals(mut self, minutely: PollInterval, hourly: PollInterval) -> Self {
        self.minutely_interval = minutely;
        self.hourly_interval = hourly;
        self
    }

    #[must_use]
    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }

    #[must_use]
    pub fn with_location_name(mut self, location_name: impl Into<String>) -> Self {
        self.location_name = location_name.into();
        self
    }
}

/// Builds installations from config entries
pub struct IntegrationService {
    forecast: Arc<dyn ForecastPort>,
    registrar: Option<AssetRegistrar>,
}

impl IntegrationService {
    pub fn new(forecast: Arc<dyn ForecastPort>) -> Self {
        Self {
            forecast,
            registrar: None,
        }
    }

    /// Register the dashboard card during setup
    #[must_use]
    pub fn with_registrar(mut self, registrar: AssetRegistrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Set up an entry
    ///
    /// Card registration failures are logged and retried on the next
    /// setup. A failed first refresh aborts with `SetupFailed`.
    #[instrument(skip_all, fields(entry_id = %entry.entry_id, location = %entry.location))]
    pub async fn setup(
        &self,
        entry: &ConfigEntry,
        registration: &RegistrationState,
    ) -> Result<Installation, ApplicationError> {
        if let Some(registrar) = &self.registrar {
            if let Err(e) = registration.ensure_registered(registrar).await {
                warn!(error = %e, "Card registration failed, will retry on next setup");
            }
        }

        let minutely = Arc::new(Coordinator::minutely(
            entry.location,
            entry.minutely_interval,
            Arc::clone(&self.forecast),
        ));
        let hourly = Arc::new(Coordinator::hourly(
            entry.location,
            entry.hourly_interval,
            Arc::clone(&self.forecast),
        ));

        minutely.first_refresh().await?;
        hourly.first_refresh().await?;

        let tasks = vec![minutely.spawn(), hourly.spawn()];

        let sensors = SENSOR_DESCRIPTORS
            .iter()
            .map(|descriptor| {
                let coordinator = match descriptor.feed {
                    ForecastFeed::Minutely => &minutely,
                    ForecastFeed::Hourly | ForecastFeed::Validation => &hourly,
                };
                SensorEntity::new(&entry.entry_id, descriptor, Arc::clone(coordinator))
            })
            .collect();

        info!("Installation ready");
        Ok(Installation {
            entry: entry.clone(),
            minutely,
            hourly,
            sensors,
            tasks: Mutex::new(tasks),
            unloaded: AtomicBool::new(false),
        })
    }
}

impl fmt::Debug for IntegrationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationService")
            .field("registrar", &self.registrar.is_some())
            .finish_non_exhaustive()
    }
}

/// A running set-up entry: two coordinators and their sensors
pub struct Installation {
    entry: ConfigEntry,
    minutely: Arc<Coordinator>,
    hourly: Arc<Coordinator>,
    sensors: Vec<SensorEntity>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    unloaded: AtomicBool,
}

impl Installation {
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    pub fn sensors(&self) -> &[SensorEntity] {
        &self.sensors
    }

    pub fn sensor(&self, key: &str) -> Option<&SensorEntity> {
        self.sensors.iter().find(|sensor| sensor.key() == key)
    }

    pub fn coordinators(&self) -> [&Arc<Coordinator>; 2] {
        [&self.minutely, &self.hourly]
    }

    /// Context for reading sensors at `now`
    pub fn context(&self, now: DateTime<Utc>) -> SensorContext<'_> {
        SensorContext {
            now,
            unit_system: self.entry.unit_system,
            location_name: &self.entry.location_name,
        }
    }

    /// States of every sensor at `now`
    pub fn states(&self, now: DateTime<Utc>) -> Vec<SensorState> {
        let ctx = self.context(now);
        self.sensors.iter().map(|sensor| sensor.state(&ctx)).collect()
    }

    /// State of one sensor by key
    pub fn state_of(&self, key: &str, now: DateTime<Utc>) -> Option<SensorState> {
        self.sensor(key).map(|sensor| sensor.state(&self.context(now)))
    }

    pub fn statuses(&self) -> Vec<CoordinatorStatus> {
        self.coordinators().iter().map(|c| c.status()).collect()
    }

    /// Whether every coordinator holds a snapshot
    pub fn is_ready(&self) -> bool {
        self.coordinators().iter().all(|c| c.snapshots().has_data())
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded.load(Ordering::Acquire)
    }

    /// Stop both timers and discard their snapshots; safe to call more than once
    pub fn unload(&self) {
        if !self.unloaded.swap(true, Ordering::AcqRel) {
            for coordinator in self.coordinators() {
                coordinator.stop();
                coordinator.snapshots().clear();
            }
            info!(entry_id = %self.entry.entry_id, "Installation unloaded");
        }
    }

    /// Unload and wait for both timer tasks to finish
    pub async fn shutdown(&self) {
        self.unload();
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Coordinator task ended abnormally");
            }
        }
    }
}

impl Drop for Installation {
    fn drop(&mut self) {
        self.unload();
    }
}

impl fmt::Debug for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installation")
            .field("entry_id", &self.entry.entry_id)
            .field("sensors", &self.sensors.len())
            .field("unloaded", &self.is_unloaded())
            .finish_non_exhaustive()
    }
}

//! Polling coordinators
//!
//! A coordinator owns one forecast feed: it fetches on a fixed interval,
//! commits each successful result to its [`SnapshotHolder`] and keeps the
//! previous snapshot when a fetch fails. The minutely and hourly
//! coordinators are two instances of the same type.
//!
//! ```text
//! Idle -> Fetching -> Ready | Failed -> (tick) Fetching -> ...
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use domain::{ForecastFeed, ForecastSnapshot, GeoLocation, PollInterval};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::snapshot_holder::SnapshotHolder;
use crate::error::ApplicationError;
use crate::ports::ForecastPort;

/// Name of the minute-level coordinator
pub const MINUTELY_COORDINATOR: &str = "Precipitation Radial Minutely";
/// Name of the hourly coordinator
pub const HOURLY_COORDINATOR: &str = "Precipitation Radial Hourly";

/// Lifecycle state of a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorState {
    /// Nothing fetched yet
    Idle,
    /// A fetch is in flight
    Fetching,
    /// The last fetch succeeded
    Ready,
    /// The last fetch failed
    Failed,
}

#[derive(Debug)]
struct Health {
    state: CoordinatorState,
    last_success: Option<DateTime<Utc>>,
    last_failure: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Point-in-time report of a coordinator's health
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatorStatus {
    pub name: &'static str,
    pub feed: ForecastFeed,
    pub state: CoordinatorState,
    pub interval_secs: u64,
    pub has_data: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub success_count: u64,
    pub failure_count: u64,
    pub active: bool,
}

/// Periodic-refresh cache of one forecast feed
pub struct Coordinator {
    name: &'static str,
    feed: ForecastFeed,
    location: GeoLocation,
    interval: PollInterval,
    port: Arc<dyn ForecastPort>,
    snapshot: SnapshotHolder,
    health: RwLock<Health>,
    successes: AtomicU64,
    failures: AtomicU64,
    active: AtomicBool,
    shutdown: watch::Sender<bool>,
}

impl Coordinator {
    /// Create a coordinator for an arbitrary feed
    pub fn new(
        name: &'static str,
        feed: ForecastFeed,
        location: GeoLocation,
        interval: PollInterval,
        port: Arc<dyn ForecastPort>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            name,
            feed,
            location,
            interval,
            port,
            snapshot: SnapshotHolder::new(),
            health: RwLock::new(Health {
                state: CoordinatorState::Idle,
                last_success: None,
                last_failure: None,
                last_error: None,
            }),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            active: AtomicBool::new(true),
            shutdown,
        }
    }

    /// Coordinator for minute-level precipitation
    pub fn minutely(
        location: GeoLocation,
        interval: PollInterval,
        port: Arc<dyn ForecastPort>,
    ) -> Self {
        Self::new(MINUTELY_COORDINATOR, ForecastFeed::Minutely, location, interval, port)
    }

    /// Coordinator for current conditions and the hourly forecast
    pub fn hourly(location: GeoLocation, interval: PollInterval, port: Arc<dyn ForecastPort>) -> Self {
        Self::new(HOURLY_COORDINATOR, ForecastFeed::Hourly, location, interval, port)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn feed(&self) -> ForecastFeed {
        self.feed
    }

    pub fn interval(&self) -> PollInterval {
        self.interval
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> Option<Arc<ForecastSnapshot>> {
        self.snapshot.load()
    }

    /// Holder of the committed snapshot, for subscribing to changes
    pub fn snapshots(&self) -> &SnapshotHolder {
        &self.snapshot
    }

    pub fn state(&self) -> CoordinatorState {
        self.health.read().state
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Fetch once and commit the result
    ///
    /// On failure the previous snapshot is kept and the error is returned.
    /// After [`stop`](Self::stop) the result of the fetch is discarded.
    pub async fn refresh(&self) -> Result<(), ApplicationError> {
        let previous = {
            let mut health = self.health.write();
            std::mem::replace(&mut health.state, CoordinatorState::Fetching)
        };

        let result = self.port.fetch(&self.location, self.feed).await;

        if !self.is_active() {
            debug!(coordinator = self.name, "Discarding fetch result after stop");
            self.health.write().state = previous;
            return result.map(|_| ());
        }

        let now = Utc::now();
        match result {
            Ok(snapshot) => {
                let version = self.snapshot.replace(snapshot);
                self.successes.fetch_add(1, Ordering::Relaxed);
                let mut health = self.health.write();
                health.state = CoordinatorState::Ready;
                health.last_success = Some(now);
                health.last_error = None;
                debug!(coordinator = self.name, version, "Snapshot committed");
                Ok(())
            },
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                let mut health = self.health.write();
                health.state = CoordinatorState::Failed;
                health.last_failure = Some(now);
                health.last_error = Some(e.to_string());
                Err(e)
            },
        }
    }

    /// Mandatory refresh during setup; failure aborts setup
    pub async fn first_refresh(&self) -> Result<(), ApplicationError> {
        self.refresh()
            .await
            .map_err(|e| ApplicationError::setup_failed(self.name, e))
    }

    /// Start the refresh timer
    ///
    /// The first tick fires one interval from now; the setup refresh
    /// already covered the immediate one. Failures are logged and retried
    /// on the next tick.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let mut shutdown = self.shutdown.subscribe();
        info!(
            coordinator = self.name,
            interval_secs = self.interval.as_secs(),
            "Starting refresh timer"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(coordinator.interval.as_duration());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            while coordinator.is_active() {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = coordinator.refresh().await {
                            warn!(
                                coordinator = coordinator.name,
                                error = %e,
                                retryable = e.is_retryable(),
                                "Refresh failed, keeping previous data"
                            );
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!(coordinator = coordinator.name, "Refresh timer stopped");
        })
    }

    /// Stop future ticks
    ///
    /// An in-flight fetch is allowed to finish; its result is not committed.
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            self.shutdown.send_replace(true);
            info!(coordinator = self.name, "Coordinator stopped");
        }
    }

    pub fn status(&self) -> CoordinatorStatus {
        let health = self.health.read();
        CoordinatorStatus {
            name: self.name,
            feed: self.feed,
            state: health.state,
            interval_secs: self.interval.as_secs(),
            has_data: self.snapshot.has_data(),
            last_success: health.last_success,
            last_failure: health.last_failure,
            last_error: health.last_error.clone(),
            success_count: self.successes.load(Ordering::Relaxed),
            failure_count: self.failures.load(Ordering::Relaxed),
            active: self.is_active(),
        }
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("name", &self.name)
            .field("feed", &self.feed)
            .field("location", &self.location)
            .field("interval", &self.interval)
            .field("state", &self.state())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

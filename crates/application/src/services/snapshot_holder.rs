//! Subscribable holder for the latest forecast snapshot

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use domain::ForecastSnapshot;
use tokio::sync::watch;

/// Latest committed snapshot of one coordinator
///
/// Reads are lock-free and never observe a partially written snapshot.
/// Every replacement bumps a version counter that readers can watch.
pub struct SnapshotHolder {
    current: ArcSwapOption<ForecastSnapshot>,
    version: watch::Sender<u64>,
}

impl SnapshotHolder {
    /// Create an empty holder at version 0
    #[must_use]
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            current: ArcSwapOption::empty(),
            version,
        }
    }

    /// The most recently committed snapshot
    pub fn load(&self) -> Option<Arc<ForecastSnapshot>> {
        self.current.load_full()
    }

    /// Whether a snapshot has been committed
    pub fn has_data(&self) -> bool {
        self.current.load().is_some()
    }

    /// Commit a new snapshot and return the new version
    pub fn replace(&self, snapshot: ForecastSnapshot) -> u64 {
        self.current.store(Some(Arc::new(snapshot)));
        self.bump()
    }

    /// Drop the snapshot
    pub fn clear(&self) -> u64 {
        self.current.store(None);
        self.bump()
    }

    /// Receive a notification on every commit
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Current version
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump(&self) -> u64 {
        let mut next = 0;
        self.version.send_modify(|version| {
            *version += 1;
            next = *version;
        });
        next
    }
}

impl Default for SnapshotHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnapshotHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotHolder")
            .field("has_data", &self.has_data())
            .field("version", &self.version())
            .finish()
    }
}

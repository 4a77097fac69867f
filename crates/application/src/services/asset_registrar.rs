//! Dashboard card registration
//!
//! Installs the bundled card where the web server serves it and makes sure
//! the dashboard loads it through exactly one resource entry. The resource
//! URL carries a content hash so browsers refetch the card when it changes.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::error::ApplicationError;
use crate::ports::{AssetStorePort, NewResource, ResourceRegistryPort};

/// Name that identifies the card's resource entry
pub const CARD_LOGICAL_NAME: &str = "precipitation-radial-card";

/// Path the card is served under
pub const CARD_URL_PATH: &str =
    "/local/community/precipitation-radial-card/precipitation-radial-card.js";

const VERSION_LEN: usize = 8;

/// Short content hash used as the cache-busting version tag
pub fn content_version(contents: &[u8]) -> String {
    let hash = blake3::hash(contents).to_hex();
    hash.as_str()[..VERSION_LEN].to_string()
}

/// Resource URL for a given version tag
pub fn versioned_url(version: &str) -> String {
    format!("{CARD_URL_PATH}?v={version}")
}

/// What happened to the resource entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Result of one registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
    pub version: String,
    pub url: String,
    /// Whether the served copy was (re)written
    pub copied: bool,
    pub resource: ResourceOutcome,
}

/// Copies the card and registers it as a dashboard resource
pub struct AssetRegistrar {
    assets: Arc<dyn AssetStorePort>,
    resources: Arc<dyn ResourceRegistryPort>,
}

impl AssetRegistrar {
    pub fn new(assets: Arc<dyn AssetStorePort>, resources: Arc<dyn ResourceRegistryPort>) -> Self {
        Self { assets, resources }
    }

    /// Install the card and create or update its resource entry
    ///
    /// Idempotent: with unchanged contents nothing is written and no entry
    /// is added. A changed card updates the existing entry in place.
    #[instrument(skip(self))]
    pub async fn register(&self) -> Result<RegistrationReport, ApplicationError> {
        let source = self.assets.read_source().await?;
        let version = content_version(&source);
        let url = versioned_url(&version);

        let copied = if self.assets.read_installed().await?.as_deref() == Some(source.as_slice()) {
            debug!("Served card is up to date");
            false
        } else {
            self.assets.install(&source).await?;
            true
        };

        let existing = self
            .resources
            .list()
            .await?
            .into_iter()
            .find(|item| item.url.contains(CARD_LOGICAL_NAME));

        let resource = match existing {
            Some(item) if item.url == url => ResourceOutcome::Unchanged,
            Some(item) => {
                self.resources
                    .update(&item.id, NewResource::module(url.clone()))
                    .await?;
                ResourceOutcome::Updated
            },
            None => {
                self.resources.create(NewResource::module(url.clone())).await?;
                ResourceOutcome::Created
            },
        };

        info!(%version, copied, outcome = ?resource, "Card registered");
        Ok(RegistrationReport {
            version,
            url,
            copied,
            resource,
        })
    }
}

impl fmt::Debug for AssetRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistrar").finish_non_exhaustive()
    }
}

/// Process-wide record of whether the card has been registered
///
/// Shared by every setup in the process. A failed registration leaves the
/// state unset so the next setup tries again.
#[derive(Debug, Default)]
pub struct RegistrationState {
    report: OnceCell<RegistrationReport>,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register unless a previous call already succeeded
    pub async fn ensure_registered(
        &self,
        registrar: &AssetRegistrar,
    ) -> Result<&RegistrationReport, ApplicationError> {
        self.report.get_or_try_init(|| registrar.register()).await
    }

    pub fn is_registered(&self) -> bool {
        self.report.initialized()
    }
}

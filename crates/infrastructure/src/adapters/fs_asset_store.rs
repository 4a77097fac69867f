//! Filesystem asset store - Implements AssetStorePort on local directories

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::AssetStorePort;
use async_trait::async_trait;
use tracing::{debug, info};

/// Directory under the served root that holds the card
pub const CARD_INSTALL_DIR: &str = "community/precipitation-radial-card";
/// File name of the card
pub const CARD_FILE_NAME: &str = "precipitation-radial-card.js";

/// Reads the bundled card and installs it below the served www directory
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    source: PathBuf,
    target: PathBuf,
}

impl FsAssetStore {
    /// Store copying `source` to `{www_dir}/community/precipitation-radial-card/`
    pub fn new(source: impl Into<PathBuf>, www_dir: impl AsRef<Path>) -> Self {
        Self {
            source: source.into(),
            target: www_dir.as_ref().join(CARD_INSTALL_DIR).join(CARD_FILE_NAME),
        }
    }

    /// Path the card is installed to
    pub fn target(&self) -> &Path {
        &self.target
    }

    fn storage_error(action: &str, path: &Path, err: &std::io::Error) -> ApplicationError {
        ApplicationError::Storage(format!("{action} {}: {err}", path.display()))
    }
}

#[async_trait]
impl AssetStorePort for FsAssetStore {
    async fn read_source(&self) -> Result<Vec<u8>, ApplicationError> {
        tokio::fs::read(&self.source)
            .await
            .map_err(|e| Self::storage_error("reading", &self.source, &e))
    }

    async fn read_installed(&self) -> Result<Option<Vec<u8>>, ApplicationError> {
        match tokio::fs::read(&self.target).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.target.display(), "Card not installed yet");
                Ok(None)
            },
            Err(e) => Err(Self::storage_error("reading", &self.target, &e)),
        }
    }

    async fn install(&self, contents: &[u8]) -> Result<(), ApplicationError> {
        if let Some(dir) = self.target.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Self::storage_error("creating", dir, &e))?;
        }
        tokio::fs::write(&self.target, contents)
            .await
            .map_err(|e| Self::storage_error("writing", &self.target, &e))?;
        info!(path = %self.target.display(), bytes = contents.len(), "Card installed");
        Ok(())
    }
}

//! Static asset store port
//!
//! The dashboard card ships with the service and is copied into the
//! directory the web server serves.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading the bundled card and installing it where it is served
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssetStorePort: Send + Sync {
    /// Bytes of the bundled asset
    async fn read_source(&self) -> Result<Vec<u8>, ApplicationError>;

    /// Bytes of the currently served copy, `None` if it is not installed
    async fn read_installed(&self) -> Result<Option<Vec<u8>>, ApplicationError>;

    /// Write the served copy, creating directories as needed
    async fn install(&self, contents: &[u8]) -> Result<(), ApplicationError>;
}

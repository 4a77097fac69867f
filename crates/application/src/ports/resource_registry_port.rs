//! Dashboard resource registry port
//!
//! The dashboard loads custom cards from a list of resources. Each entry has
//! a stable id, a resource type and a URL.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApplicationError;

/// How the dashboard loads a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// ES module
    #[default]
    Module,
    /// Classic script
    Js,
    /// Stylesheet
    Css,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Js => write!(f, "js"),
            Self::Css => write!(f, "css"),
        }
    }
}

/// A registered resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItem {
    /// Stable identifier
    pub id: String,
    /// Resource type
    pub res_type: ResourceType,
    /// URL the dashboard loads
    pub url: String,
}

/// Fields for creating or updating a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    /// Resource type
    pub res_type: ResourceType,
    /// URL the dashboard loads
    pub url: String,
}

impl NewResource {
    /// An ES module resource
    pub fn module(url: impl Into<String>) -> Self {
        Self {
            res_type: ResourceType::Module,
            url: url.into(),
        }
    }
}

/// Port for the dashboard resource collection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResourceRegistryPort: Send + Sync {
    /// List all registered resources
    async fn list(&self) -> Result<Vec<ResourceItem>, ApplicationError>;

    /// Register a new resource
    async fn create(&self, resource: NewResource) -> Result<ResourceItem, ApplicationError>;

    /// Replace the fields of an existing resource, keeping its id
    async fn update(
        &self,
        id: &str,
        resource: NewResource,
    ) -> Result<ResourceItem, ApplicationError>;
}

//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod asset_store_port;
mod forecast_port;
mod resource_registry_port;

pub use asset_store_port::AssetStorePort;
#[cfg(test)]
pub use asset_store_port::MockAssetStorePort;
pub use forecast_port::ForecastPort;
#[cfg(test)]
pub use forecast_port::MockForecastPort;
#[cfg(test)]
pub use resource_registry_port::MockResourceRegistryPort;
pub use resource_registry_port::{NewResource, ResourceItem, ResourceRegistryPort, ResourceType};

//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod forecast_adapter;
mod fs_asset_store;
mod json_resource_store;

pub use forecast_adapter::PirateWeatherAdapter;
pub use fs_asset_store::{CARD_FILE_NAME, CARD_INSTALL_DIR, FsAssetStore};
pub use json_resource_store::JsonResourceStore;

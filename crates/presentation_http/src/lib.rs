//! Precipitation Radial HTTP presentation layer
//!
//! Serves sensor states, coordinator readiness and the card's static files.

pub mod config_reload;
pub mod error;
pub mod handlers;
pub mod host;
pub mod routes;
pub mod state;

pub use config_reload::{ReloadableConfig, spawn_config_reload_handler};
pub use error::ApiError;
pub use host::{IntegrationHost, build_service, card_registrar};
pub use routes::create_router;
pub use state::AppState;

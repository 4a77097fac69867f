//! Application state shared across handlers

use std::sync::Arc;

use crate::host::IntegrationHost;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Running installation, swapped on reload
    pub host: Arc<IntegrationHost>,
}

impl AppState {
    pub fn new(host: Arc<IntegrationHost>) -> Self {
        Self { host }
    }
}

//! Dashboard card configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the card comes from and where it is served
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CardConfig {
    /// Register the card on setup
    #[serde(default = "super::default_true")]
    pub enabled: bool,

    /// Bundled card script
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// Directory served under `/local/`
    #[serde(default = "default_www_dir")]
    pub www_dir: PathBuf,

    /// JSON document holding the dashboard resource collection
    #[serde(default = "default_resources_file")]
    pub resources_file: PathBuf,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("assets/precipitation-radial-card.js")
}

fn default_www_dir() -> PathBuf {
    PathBuf::from("www")
}

fn default_resources_file() -> PathBuf {
    PathBuf::from("data/lovelace_resources.json")
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_path: default_source_path(),
            www_dir: default_www_dir(),
            resources_file: default_resources_file(),
        }
    }
}

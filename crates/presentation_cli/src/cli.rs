//! Command-line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Precipitation Radial CLI
#[derive(Debug, Parser)]
#[command(name = "precipitation-radial-cli")]
#[command(author, version, about = "Precipitation Radial administration CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "PRECIPITATION_RADIAL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check the configured API key against the forecast service
    Validate,

    /// Install the dashboard card and register its resource entry
    RegisterCard,

    /// Show sensor states from a running server
    Sensors {
        /// Only this sensor
        key: Option<String>,

        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Show coordinator status from a running server
    Status {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Exit non-zero unless the server is ready (used by Docker healthcheck)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Join a server URL and an API path
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

//! Precipitation Radial CLI
//!
//! Credential checks, card registration and read-only access to a running
//! server.

#![allow(clippy::print_stdout)]

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use application::CredentialValidator;
use clap::Parser;
use cli::{Cli, Commands, endpoint_url, log_filter_from_verbosity};
use infrastructure::{AppConfig, PirateWeatherAdapter, TelemetryConfig, init_tracing};
use presentation_http::card_registrar;
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(&TelemetryConfig {
        log_filter: log_filter_from_verbosity(cli.verbose).to_string(),
        json: false,
    })?;

    let load_config = || {
        AppConfig::load_from(cli.config.as_deref()).context("failed to load configuration")
    };
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Validate => {
            let config = load_config()?;
            let entry = config.config_entry()?;
            let adapter = PirateWeatherAdapter::new(config.pirateweather.to_client_config())?;
            let outcome = CredentialValidator::new(Arc::new(adapter))
                .validate(&entry.location)
                .await;

            if outcome.is_valid() {
                println!("✅ API key accepted for {}", entry.location);
            } else {
                println!("❌ Validation failed: {outcome}");
                return Ok(ExitCode::FAILURE);
            }
        },

        Commands::RegisterCard => {
            let config = load_config()?;
            let report = card_registrar(&config.card).register().await?;

            println!("🗂️  Card registered:");
            println!("{}", serde_json::to_string_pretty(&report)?);
        },

        Commands::Sensors { key, url } => {
            let path = key.map_or_else(
                || "/api/sensors".to_string(),
                |key| format!("/api/sensors/{key}"),
            );
            let resp = client.get(endpoint_url(&url, &path)).send().await?;
            let status = resp.status();
            let body = resp.json::<Value>().await?;

            println!("{}", serde_json::to_string_pretty(&body)?);
            if !status.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        },

        Commands::Status { url } => {
            let resp = client
                .get(endpoint_url(&url, "/ready"))
                .send()
                .await?
                .json::<Value>()
                .await?;

            println!("📊 Coordinator Status:");
            println!("{}", serde_json::to_string_pretty(&resp)?);
        },

        Commands::Health { url } => match client.get(endpoint_url(&url, "/ready")).send().await {
            Ok(resp) if resp.status().is_success() => println!("✅ Healthy"),
            Ok(resp) => {
                println!("❌ Unhealthy: HTTP {}", resp.status());
                return Ok(ExitCode::FAILURE);
            },
            Err(e) => {
                println!("❌ Unhealthy: {e}");
                return Ok(ExitCode::FAILURE);
            },
        },
    }

    Ok(ExitCode::SUCCESS)
}

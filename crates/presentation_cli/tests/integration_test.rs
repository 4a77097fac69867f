//! Integration tests for CLI
//!
//! Exercise argument parsing without running any command.

#![allow(clippy::panic, clippy::unwrap_used)]

#[path = "../src/cli.rs"]
mod cli;

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands, endpoint_url, log_filter_from_verbosity};

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn parses_validate() {
    let cli = parse_args(&["precipitation-radial-cli", "validate"]).unwrap();
    assert!(matches!(cli.command, Commands::Validate));
}

#[test]
fn parses_register_card_with_config() {
    let cli = parse_args(&[
        "precipitation-radial-cli",
        "register-card",
        "--config",
        "/etc/precip.toml",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::RegisterCard));
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/precip.toml")));
}

#[test]
fn sensors_defaults_to_local_server() {
    let cli = parse_args(&["precipitation-radial-cli", "sensors"]).unwrap();
    match cli.command {
        Commands::Sensors { key, url } => {
            assert!(key.is_none());
            assert_eq!(url, "http://localhost:3000");
        },
        other => panic!("Expected Sensors, got {other:?}"),
    }
}

#[test]
fn sensors_accepts_key_and_url() {
    let cli = parse_args(&[
        "precipitation-radial-cli",
        "sensors",
        "today_high_temperature",
        "--url",
        "http://pi:8080",
    ])
    .unwrap();
    match cli.command {
        Commands::Sensors { key, url } => {
            assert_eq!(key.as_deref(), Some("today_high_temperature"));
            assert_eq!(url, "http://pi:8080");
        },
        other => panic!("Expected Sensors, got {other:?}"),
    }
}

#[test]
fn parses_status_and_health() {
    let cli = parse_args(&["precipitation-radial-cli", "status", "-u", "http://a:1"]).unwrap();
    assert!(matches!(cli.command, Commands::Status { ref url } if url == "http://a:1"));

    let cli = parse_args(&["precipitation-radial-cli", "health"]).unwrap();
    assert!(matches!(cli.command, Commands::Health { .. }));
}

#[test]
fn counts_verbosity() {
    let cli = parse_args(&["precipitation-radial-cli", "-vv", "validate"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(log_filter_from_verbosity(cli.verbose), "debug");
    assert_eq!(log_filter_from_verbosity(0), "warn");
    assert_eq!(log_filter_from_verbosity(9), "trace");
}

#[test]
fn rejects_unknown_command() {
    assert!(parse_args(&["precipitation-radial-cli", "chat", "hi"]).is_err());
}

#[test]
fn requires_a_command() {
    assert!(parse_args(&["precipitation-radial-cli"]).is_err());
}

#[test]
fn endpoint_url_joins_paths() {
    assert_eq!(
        endpoint_url("http://localhost:3000", "/ready"),
        "http://localhost:3000/ready"
    );
    assert_eq!(
        endpoint_url("http://example.com/", "/api/sensors"),
        "http://example.com/api/sensors"
    );
}

//! Logging setup
//!
//! Structured logging via `tracing-subscriber`: an `EnvFilter` (overridable
//! with `RUST_LOG`) and a fmt layer with optional JSON output.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_tracing};

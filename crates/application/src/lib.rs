//! Application layer - Use cases and orchestration
//!
//! Polling coordinators, sensor derivation, card registration and the
//! integration lifecycle. Talks to the outside world only through ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

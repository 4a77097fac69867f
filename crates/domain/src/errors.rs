//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the valid range
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Poll interval outside the range allowed for its feed
    #[error("Invalid {feed} interval: {secs}s is out of range (must be {min}-{max}s)")]
    InvalidInterval {
        feed: &'static str,
        secs: u64,
        min: u64,
        max: u64,
    },

    /// Unknown unit system name
    #[error("Invalid unit system: {0}. Use 'metric' or 'imperial'")]
    InvalidUnitSystem(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The forecast API rejected the API key
    #[error("Invalid API key")]
    InvalidCredentials,

    /// Network failure, timeout, or an unexpected HTTP status
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// The forecast API answered with something that is not a forecast
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A mandatory first refresh failed, so setup was aborted
    #[error("Setup failed: {coordinator} could not fetch initial data: {source}")]
    SetupFailed {
        coordinator: String,
        #[source]
        source: Box<ApplicationError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading or writing a local store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error clears up on its own when the fetch is retried
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailure(_) | Self::MalformedResponse(_)
        )
    }

    /// Wrap an error as the cause of a failed setup
    pub fn setup_failed(coordinator: impl Into<String>, source: Self) -> Self {
        Self::SetupFailed {
            coordinator: coordinator.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error, or the error that aborted setup, is a credential rejection
    pub fn is_invalid_credentials(&self) -> bool {
        match self {
            Self::InvalidCredentials => true,
            Self::SetupFailed { source, .. } => source.is_invalid_credentials(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::ConnectionFailure("timeout".into()).is_retryable());
        assert!(ApplicationError::MalformedResponse("html".into()).is_retryable());
        assert!(!ApplicationError::InvalidCredentials.is_retryable());
        assert!(!ApplicationError::Configuration("x".into()).is_retryable());
    }

    #[test]
    fn setup_failed_keeps_cause() {
        let err = ApplicationError::setup_failed(
            "Precipitation Radial Minutely",
            ApplicationError::InvalidCredentials,
        );
        assert!(err.is_invalid_credentials());
        assert_eq!(
            err.to_string(),
            "Setup failed: Precipitation Radial Minutely could not fetch initial data: Invalid API key"
        );
    }

    #[test]
    fn domain_errors_convert() {
        let err: ApplicationError = DomainError::InvalidCoordinates.into();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }
}

//! API key validation
//!
//! A lightweight fetch of current conditions decides whether a key and
//! location can be configured.

use std::fmt;
use std::sync::Arc;

use domain::{ForecastFeed, GeoLocation};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::ports::ForecastPort;

/// Outcome of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// The key was accepted
    Valid,
    /// The API answered 403
    InvalidApiKey,
    /// Any other failure
    CannotConnect,
}

impl ValidationOutcome {
    /// Error key shown to the user, `None` when valid
    pub const fn error_key(self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::InvalidApiKey => Some("invalid_api_key"),
            Self::CannotConnect => Some("cannot_connect"),
        }
    }

    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_key().unwrap_or("valid"))
    }
}

/// Checks an API key against the forecast service
pub struct CredentialValidator {
    forecast: Arc<dyn ForecastPort>,
}

impl CredentialValidator {
    pub fn new(forecast: Arc<dyn ForecastPort>) -> Self {
        Self { forecast }
    }

    #[instrument(skip(self))]
    pub async fn validate(&self, location: &GeoLocation) -> ValidationOutcome {
        match self.forecast.fetch(location, ForecastFeed::Validation).await {
            Ok(_) => ValidationOutcome::Valid,
            Err(e) if e.is_invalid_credentials() => ValidationOutcome::InvalidApiKey,
            Err(e) => {
                debug!(error = %e, "Credential check could not reach the API");
                ValidationOutcome::CannotConnect
            },
        }
    }
}

impl fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain::ForecastSnapshot;

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::MockForecastPort;

    fn validator(result: fn() -> Result<ForecastSnapshot, ApplicationError>) -> CredentialValidator {
        let mut port = MockForecastPort::new();
        port.expect_fetch()
            .withf(|_, feed| *feed == ForecastFeed::Validation)
            .times(1)
            .returning(move |_, _| result());
        CredentialValidator::new(Arc::new(port))
    }

    fn location() -> GeoLocation {
        GeoLocation::new(10.0, 20.0).expect("valid coordinates")
    }

    #[tokio::test]
    async fn accepted_key_is_valid() {
        let outcome = validator(|| Ok(ForecastSnapshot::new(Utc::now())))
            .validate(&location())
            .await;
        assert_eq!(outcome, ValidationOutcome::Valid);
        assert!(outcome.is_valid());
        assert_eq!(outcome.error_key(), None);
    }

    #[tokio::test]
    async fn forbidden_is_invalid_api_key() {
        let outcome = validator(|| Err(ApplicationError::InvalidCredentials))
            .validate(&location())
            .await;
        assert_eq!(outcome, ValidationOutcome::InvalidApiKey);
        assert_eq!(outcome.error_key(), Some("invalid_api_key"));
    }

    #[tokio::test]
    async fn other_failures_cannot_connect() {
        let outcome = validator(|| Err(ApplicationError::ConnectionFailure("HTTP 500".into())))
            .validate(&location())
            .await;
        assert_eq!(outcome, ValidationOutcome::CannotConnect);
        assert_eq!(outcome.to_string(), "cannot_connect");
    }
}

//! Port for the geocoding/representative-lookup service.

use async_trait::async_trait;

use crate::domain::location::Jurisdiction;

/// Errors surfaced by civic lookup adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CivicLookupError {
    /// The postal code is not a shape the upstream accepts.
    #[error("civic lookup rejected postal code: {message}")]
    InvalidPostalCode { message: String },
    /// Network or protocol failure reaching the upstream.
    #[error("civic lookup transport failed: {message}")]
    Transport { message: String },
    /// The upstream responded but the payload could not be decoded.
    #[error("civic lookup payload invalid: {message}")]
    Decode { message: String },
}

impl CivicLookupError {
    pub fn invalid_postal_code(message: impl Into<String>) -> Self {
        Self::InvalidPostalCode {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port mapping a postal code to its jurisdiction: city/state/region plus
/// the elected officials serving it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CivicLookup: Send + Sync {
    /// Resolve one postal code.
    async fn lookup_postal_code(&self, postal_code: &str)
    -> Result<Jurisdiction, CivicLookupError>;
}

/// Fixture implementation for tests that never reach the lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCivicLookup;

#[async_trait]
impl CivicLookup for FixtureCivicLookup {
    async fn lookup_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Jurisdiction, CivicLookupError> {
        Ok(Jurisdiction::unknown(postal_code))
    }
}

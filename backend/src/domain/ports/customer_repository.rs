//! Port for customer persistence keyed on normalized email.

use async_trait::async_trait;

use crate::domain::orders::{Customer, CustomerUpsert};

/// Errors raised by customer repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerRepositoryError {
    /// Repository connection could not be established.
    #[error("customer repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("customer repository query failed: {message}")]
    Query { message: String },
}

impl CustomerRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port upserting customers on their normalized email identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert or update the customer row for this normalized email.
    ///
    /// The upsert key is the normalized value; the sharing token minted at
    /// first insert survives later upserts.
    async fn upsert(&self, customer: &CustomerUpsert) -> Result<Customer, CustomerRepositoryError>;
}

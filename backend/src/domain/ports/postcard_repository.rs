//! Port for postcard persistence, one row per dispatch attempt.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::orders::{NewPostcard, Postcard};

/// Errors raised by postcard repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostcardRepositoryError {
    /// Repository connection could not be established.
    #[error("postcard repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("postcard repository query failed: {message}")]
    Query { message: String },
}

impl PostcardRepositoryError {
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

/// Port recording every dispatch attempt, success or vendor failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostcardRepository: Send + Sync {
    /// Insert one postcard row.
    async fn insert(&self, postcard: &NewPostcard) -> Result<(), PostcardRepositoryError>;

    /// List postcards for an order in creation order.
    async fn list_for_order(&self, order_id: Uuid)
    -> Result<Vec<Postcard>, PostcardRepositoryError>;
}

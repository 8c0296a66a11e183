//! Port for order persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::orders::{NewOrder, Order, PaymentStatus};

/// Errors raised by order repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRepositoryError {
    /// Repository connection could not be established.
    #[error("order repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("order repository query failed: {message}")]
    Query { message: String },
}

impl OrderRepositoryError {
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

/// Port persisting orders and their dispatch/refund bookkeeping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order row; one exists per verification, paid or failed.
    async fn insert(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError>;

    /// Increment the postcard count as dispatch attempts persist rows.
    async fn increment_postcard_count(&self, order_id: Uuid) -> Result<(), OrderRepositoryError>;

    /// Record a settled refund amount and the resulting payment status.
    async fn record_refund(
        &self,
        order_id: Uuid,
        amount_refunded_cents: i64,
        status: PaymentStatus,
    ) -> Result<(), OrderRepositoryError>;

    /// Fetch one order.
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderRepositoryError>;
}

//! Port for the payment processor.

use async_trait::async_trait;

use crate::domain::orders::RefundKey;

/// Errors surfaced by payment gateway adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentGatewayError {
    /// The session reference is unknown to the processor.
    #[error("payment session not found: {session_id}")]
    SessionNotFound { session_id: String },
    /// Network or protocol failure reaching the processor.
    #[error("payment gateway transport failed: {message}")]
    Transport { message: String },
    /// The processor did not answer inside the configured deadline.
    #[error("payment gateway timed out: {message}")]
    Timeout { message: String },
    /// The processor rejected the request itself.
    #[error("payment gateway rejected request: {message}")]
    Rejected { message: String },
    /// The processor responded with an undecodable payload.
    #[error("payment gateway payload invalid: {message}")]
    Decode { message: String },
}

impl PaymentGatewayError {
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether a retry with the same idempotency key is worthwhile.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Settled state of a checkout session as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub session_id: String,
    /// Payment-intent reference used for refunds.
    pub payment_intent_id: Option<String>,
    pub paid: bool,
    pub amount_cents: i64,
    pub payer_email: Option<String>,
    pub payer_name: Option<String>,
    /// Serialized postcard payload the checkout flow attached at session
    /// creation: message text, tier, postal code, sender address, draft id.
    pub metadata: serde_json::Value,
}

/// Port over session verification and refund issuance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the settled state of one checkout session.
    async fn fetch_session(&self, session_id: &str)
    -> Result<CheckoutSession, PaymentGatewayError>;

    /// Issue a refund against a payment intent, guarded by the idempotency
    /// key: the processor must treat a repeated key as the same refund.
    async fn refund(
        &self,
        payment_intent_id: &str,
        amount_cents: i64,
        key: &RefundKey,
    ) -> Result<(), PaymentGatewayError>;
}

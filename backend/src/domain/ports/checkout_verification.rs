//! Driving port for payment verification and fulfillment.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::fulfillment::DispatchSummary;

/// Opaque payment-session reference from the checkout redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCheckoutRequest {
    pub session_id: String,
}

/// Aggregated verification result returned to the caller once dispatch and
/// any refund have completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCheckoutResponse {
    pub order_id: Uuid,
    pub paid: bool,
    pub summary: DispatchSummary,
    /// Refund issued for failed dispatch attempts, in cents. Zero when all
    /// attempts succeeded or nothing was dispatched.
    pub refund_cents: i64,
}

/// Use-case exposed to inbound adapters for checkout verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutVerification: Send + Sync {
    /// Verify a session, materialize customer/order records, fan out
    /// dispatch, reconcile refunds, and report the aggregate.
    async fn verify(&self, request: VerifyCheckoutRequest)
    -> Result<VerifyCheckoutResponse, Error>;
}

/// Fixture implementation for handler tests that never reach checkout.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCheckoutVerification;

#[async_trait]
impl CheckoutVerification for FixtureCheckoutVerification {
    async fn verify(
        &self,
        _request: VerifyCheckoutRequest,
    ) -> Result<VerifyCheckoutResponse, Error> {
        Ok(VerifyCheckoutResponse {
            order_id: Uuid::new_v4(),
            paid: false,
            summary: DispatchSummary::default(),
            refund_cents: 0,
        })
    }
}

//! Deterministic refund reconciliation for partial dispatch failures.
//!
//! The refund amount is a pure function of the tier pricing table, and the
//! idempotency key is derived from the session and amount so repeated
//! reconciliation of the same order settles as one refund at the processor.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{error, info, warn};

use crate::domain::orders::{Order, PaymentStatus, RefundKey, refund_cents};
use crate::domain::ports::{OrderRepository, PaymentGateway, PaymentGatewayError};

use super::DispatchSummary;

const REFUND_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(250);
const JITTER_CEILING_MS: u64 = 100;

fn backoff_with_jitter(attempt: u32) -> Duration {
    let base = BACKOFF_BASE * 2_u32.saturating_pow(attempt);
    let jitter = {
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(0..=JITTER_CEILING_MS))
    };
    base + jitter
}

/// Issues refunds for failed dispatch attempts and records the settlement.
#[derive(Clone)]
pub struct RefundReconciler {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderRepository>,
}

impl RefundReconciler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { gateway, orders }
    }

    /// Reconcile one order's dispatch summary against the pricing table.
    ///
    /// Returns the refunded amount in cents; zero when nothing failed or the
    /// order carries no payment intent to refund against. Exhausted retries
    /// leave the refund outstanding for manual reconciliation.
    pub async fn reconcile(
        &self,
        order: &Order,
        payment_intent_id: Option<&str>,
        summary: DispatchSummary,
    ) -> i64 {
        let amount = refund_cents(summary.total, summary.failed);
        if amount == 0 {
            return 0;
        }
        let Some(payment_intent_id) = payment_intent_id else {
            error!(order_id = %order.id, amount_cents = amount,
                "refund due but the session carries no payment intent");
            return 0;
        };

        let key = RefundKey::derive(&order.payment_session_id, amount);
        if !self.refund_with_retry(order, payment_intent_id, amount, &key).await {
            return 0;
        }

        let status = if amount >= order.amount_paid_cents {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::Paid
        };
        if let Err(err) = self.orders.record_refund(order.id, amount, status).await {
            error!(order_id = %order.id, amount_cents = amount, %err,
                "refund settled but could not be recorded");
        }
        info!(order_id = %order.id, amount_cents = amount, failed = summary.failed,
            "refund settled");
        amount
    }

    async fn refund_with_retry(
        &self,
        order: &Order,
        payment_intent_id: &str,
        amount: i64,
        key: &RefundKey,
    ) -> bool {
        for attempt in 0..REFUND_ATTEMPTS {
            match self.gateway.refund(payment_intent_id, amount, key).await {
                Ok(()) => return true,
                Err(err) if err.is_retryable() && attempt + 1 < REFUND_ATTEMPTS => {
                    let delay = backoff_with_jitter(attempt);
                    warn!(order_id = %order.id, attempt, %err, delay_ms = delay.as_millis() as u64,
                        "retryable refund failure");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(order_id = %order.id, amount_cents = amount, %err,
                        "refund outstanding; manual reconciliation required");
                    return false;
                }
            }
        }
        false
    }
}

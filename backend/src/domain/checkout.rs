//! Checkout verification domain service.
//!
//! Implements the [`CheckoutVerification`] driving port: confirm the payment
//! session with the processor, materialize customer and order rows whatever
//! the outcome, fan out dispatch on success, reconcile partial failures with
//! a refund, and fire the confirmation email without blocking the response.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::MailingAddress;
use crate::domain::NormalizedEmail;
use crate::domain::drafts::composer::{MESSAGE_HARD_CEILING, message_len};
use crate::domain::fulfillment::{
    DispatchSummary, PostcardDispatcher, RefundReconciler, SenderProfile, expand_recipients,
};
use crate::domain::location::LocationResolver;
use crate::domain::orders::{Customer, NewOrder, Order, PackageTier, PaymentStatus};
use crate::domain::ports::{
    CheckoutSession, CheckoutVerification, CustomerRepository, CustomerRepositoryError,
    DraftRepository, EmailMessage, Mailer, OrderRepository, OrderRepositoryError, PaymentGateway,
    PaymentGatewayError, VerifyCheckoutRequest, VerifyCheckoutResponse,
};

/// Postcard payload the checkout flow attached to the session at creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionMetadata {
    message: String,
    tier: PackageTier,
    postal_code: String,
    #[serde(default)]
    draft_id: Option<Uuid>,
    #[serde(default)]
    sender_name: Option<String>,
    #[serde(default)]
    sender_address: Option<MailingAddress>,
}

fn map_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::SessionNotFound { session_id } => {
            Error::not_found(format!("payment session {session_id} not found"))
        }
        PaymentGatewayError::Transport { .. } | PaymentGatewayError::Timeout { .. } => {
            Error::service_unavailable(format!("payment gateway unavailable: {error}"))
        }
        PaymentGatewayError::Rejected { .. } | PaymentGatewayError::Decode { .. } => {
            Error::internal(format!("payment gateway error: {error}"))
        }
    }
}

fn map_customer_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
    }
}

fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

fn confirmation_email(customer: &Customer, summary: DispatchSummary, refund_cents: i64) -> EmailMessage {
    let mut body = format!(
        "Thank you for speaking up.\n\n{} of {} postcard(s) were submitted for printing.",
        summary.sent, summary.total
    );
    if refund_cents > 0 {
        let dollars = refund_cents as f64 / 100.0;
        body.push_str(&format!(
            "\n{} postcard(s) could not be submitted; a refund of ${dollars:.2} has been issued.",
            summary.failed
        ));
    }
    EmailMessage {
        to: customer.email.as_str().to_owned(),
        subject: "Your postcards are on the way".to_owned(),
        body,
    }
}

/// Payment verification and fulfillment behind the [`CheckoutVerification`]
/// port.
#[derive(Clone)]
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    customers: Arc<dyn CustomerRepository>,
    orders: Arc<dyn OrderRepository>,
    drafts: Arc<dyn DraftRepository>,
    resolver: LocationResolver,
    dispatcher: PostcardDispatcher,
    reconciler: RefundReconciler,
    mailer: Arc<dyn Mailer>,
}

impl CheckoutService {
    #[expect(clippy::too_many_arguments, reason = "wired once at startup")]
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        drafts: Arc<dyn DraftRepository>,
        resolver: LocationResolver,
        dispatcher: PostcardDispatcher,
        reconciler: RefundReconciler,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            gateway,
            customers,
            orders,
            drafts,
            resolver,
            dispatcher,
            reconciler,
            mailer,
        }
    }

    fn customer_upsert(
        session: &CheckoutSession,
        metadata: &SessionMetadata,
    ) -> Result<crate::domain::orders::CustomerUpsert, Error> {
        let raw_email = session
            .payer_email
            .as_deref()
            .ok_or_else(|| Error::invalid_request("payment session carries no payer email"))?;
        let email = NormalizedEmail::parse(raw_email)
            .map_err(|err| Error::invalid_request(format!("payer email invalid: {err}")))?;
        let display_name = metadata
            .sender_name
            .clone()
            .or_else(|| session.payer_name.clone())
            .unwrap_or_default();
        Ok(crate::domain::orders::CustomerUpsert {
            email,
            display_name,
            address: metadata.sender_address.clone(),
        })
    }

    async fn insert_order(
        &self,
        session: &CheckoutSession,
        metadata: &SessionMetadata,
        customer_id: Uuid,
        paid: bool,
    ) -> Result<Order, Error> {
        let new_order = NewOrder {
            id: Uuid::new_v4(),
            customer_id,
            draft_id: metadata.draft_id,
            tier: metadata.tier,
            payment_status: if paid {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Failed
            },
            payment_session_id: session.session_id.clone(),
            amount_paid_cents: if paid { session.amount_cents } else { 0 },
        };
        self.orders.insert(&new_order).await.map_err(map_order_error)
    }

    fn sender_profile(customer: &Customer, metadata: &SessionMetadata, city: &str) -> SenderProfile {
        let address = metadata
            .sender_address
            .clone()
            .or_else(|| customer.address.clone())
            .unwrap_or_else(|| MailingAddress {
                line1: String::new(),
                line2: None,
                city: city.to_owned(),
                state: String::new(),
                postal_code: metadata.postal_code.clone(),
            });
        SenderProfile {
            name: customer.display_name.clone(),
            address,
        }
    }

    fn notify_async(&self, customer: Customer, summary: DispatchSummary, refund_cents: i64) {
        let mailer = Arc::clone(&self.mailer);
        let email = confirmation_email(&customer, summary, refund_cents);
        tokio::spawn(async move {
            if let Err(err) = mailer.send(&email).await {
                warn!(to = %email.to, %err, "confirmation email failed");
            }
        });
    }
}

#[async_trait]
impl CheckoutVerification for CheckoutService {
    async fn verify(
        &self,
        request: VerifyCheckoutRequest,
    ) -> Result<VerifyCheckoutResponse, Error> {
        if request.session_id.trim().is_empty() {
            return Err(Error::invalid_request("missing required field: sessionId")
                .with_details(json!({ "field": "sessionId" })));
        }

        let session = self
            .gateway
            .fetch_session(&request.session_id)
            .await
            .map_err(map_gateway_error)?;
        let metadata: SessionMetadata = serde_json::from_value(session.metadata.clone())
            .map_err(|err| Error::invalid_request(format!("session metadata malformed: {err}")))?;
        if metadata.message.trim().is_empty() {
            return Err(Error::invalid_request("session metadata carries no message")
                .with_details(json!({ "field": "message" })));
        }
        let chars = message_len(&metadata.message);
        if chars > MESSAGE_HARD_CEILING {
            return Err(Error::invalid_request(format!(
                "session message exceeds the {MESSAGE_HARD_CEILING}-character ceiling"
            ))
            .with_details(json!({
                "field": "message",
                "chars": chars,
                "ceiling": MESSAGE_HARD_CEILING,
            })));
        }

        let upsert = Self::customer_upsert(&session, &metadata)?;
        let customer = self
            .customers
            .upsert(&upsert)
            .await
            .map_err(map_customer_error)?;

        if !session.paid {
            let order = self
                .insert_order(&session, &metadata, customer.id, false)
                .await?;
            info!(order_id = %order.id, session_id = %session.session_id,
                "payment not settled; order recorded for audit");
            return Ok(VerifyCheckoutResponse {
                order_id: order.id,
                paid: false,
                summary: DispatchSummary::default(),
                refund_cents: 0,
            });
        }

        let order = self
            .insert_order(&session, &metadata, customer.id, true)
            .await?;
        if let Some(draft_id) = metadata.draft_id {
            if let Err(err) = self.drafts.link_order(draft_id, order.id).await {
                error!(order_id = %order.id, %draft_id, %err, "failed to link draft to order");
            }
        }

        let jurisdiction = self.resolver.resolve_or_unknown(&metadata.postal_code).await;
        let recipients = expand_recipients(metadata.tier, &jurisdiction.officials);

        // A paid order with no resolvable recipients counts as a total
        // delivery failure so reconciliation refunds the full tier.
        let summary = if recipients.is_empty() {
            let failed = metadata.tier.recipient_count();
            error!(order_id = %order.id, postal_code = %metadata.postal_code,
                "no recipients could be resolved for a paid order");
            DispatchSummary {
                sent: 0,
                failed,
                total: failed,
            }
        } else {
            let sender = Self::sender_profile(&customer, &metadata, &jurisdiction.location.city);
            self.dispatcher
                .dispatch(&order, &recipients, &metadata.message, &sender)
                .await
        };
        let refund_cents = self
            .reconciler
            .reconcile(&order, session.payment_intent_id.as_deref(), summary)
            .await;

        info!(order_id = %order.id, sent = summary.sent, failed = summary.failed,
            refund_cents, "checkout verification settled");
        self.notify_async(customer, summary, refund_cents);

        Ok(VerifyCheckoutResponse {
            order_id: order.id,
            paid: true,
            summary,
            refund_cents,
        })
    }
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;

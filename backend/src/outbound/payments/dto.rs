//! DTOs for decoding payment processor responses.

use serde::Deserialize;

use crate::domain::ports::CheckoutSession;

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) id: String,
    pub(super) payment_intent: Option<String>,
    pub(super) payment_status: String,
    pub(super) amount_total: Option<i64>,
    pub(super) customer_details: Option<CustomerDetailsDto>,
    #[serde(default)]
    pub(super) metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct CustomerDetailsDto {
    pub(super) email: Option<String>,
    pub(super) name: Option<String>,
}

impl SessionDto {
    pub(super) fn into_session(self) -> CheckoutSession {
        let paid = self.payment_status == "paid";
        let (payer_email, payer_name) = match self.customer_details {
            Some(details) => (details.email, details.name),
            None => (None, None),
        };

        CheckoutSession {
            session_id: self.id,
            payment_intent_id: self.payment_intent,
            paid,
            amount_cents: self.amount_total.unwrap_or(0),
            payer_email,
            payer_name,
            metadata: self.metadata,
        }
    }
}

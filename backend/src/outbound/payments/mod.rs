//! Reqwest-backed payment gateway adapter.
//!
//! Speaks the processor's form-encoded REST dialect: session fetch by id and
//! refund creation guarded by an idempotency key header.

mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::orders::RefundKey;
use crate::domain::ports::{CheckoutSession, PaymentGateway, PaymentGatewayError};

use dto::SessionDto;

const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Payment gateway adapter over the processor's HTTP API.
pub struct PaymentsHttpGateway {
    client: Client,
    endpoint: Url,
    secret_key: String,
}

impl PaymentsHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        secret_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            secret_key,
        })
    }

    fn url(&self, path: &str) -> Result<Url, PaymentGatewayError> {
        self.endpoint.join(path).map_err(|error| {
            PaymentGatewayError::rejected(format!("invalid processor url {path}: {error}"))
        })
    }
}

#[async_trait]
impl PaymentGateway for PaymentsHttpGateway {
    async fn fetch_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let url = self.url(&format!("checkout/sessions/{session_id}"))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Err(PaymentGatewayError::session_not_found(session_id));
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_session(body.as_ref())
    }

    async fn refund(
        &self,
        payment_intent_id: &str,
        amount_cents: i64,
        key: &RefundKey,
    ) -> Result<(), PaymentGatewayError> {
        let url = self.url("refunds")?;
        let amount = amount_cents.to_string();
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .header(IDEMPOTENCY_KEY_HEADER, key.as_str())
            .form(&[("payment_intent", payment_intent_id), ("amount", &amount)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn parse_session(body: &[u8]) -> Result<CheckoutSession, PaymentGatewayError> {
    let decoded: SessionDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid session JSON payload: {error}"))
    })?;
    Ok(decoded.into_session())
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let preview = super::body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_client_error() => PaymentGatewayError::rejected(message),
        _ => PaymentGatewayError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for non-network mapping helpers.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn paid_sessions_decode_with_payer_and_metadata() {
        let body = r#"{
            "id": "cs_test_123",
            "payment_intent": "pi_123",
            "payment_status": "paid",
            "amount_total": 1200,
            "customer_details": { "email": "jane@example.com", "name": "Jane Doe" },
            "metadata": { "tier": "triple", "postalCode": "62701" }
        }"#;

        let session = parse_session(body.as_bytes()).expect("decodes");
        assert!(session.paid);
        assert_eq!(session.amount_cents, 1200);
        assert_eq!(session.payer_email.as_deref(), Some("jane@example.com"));
        assert_eq!(session.metadata["tier"], json!("triple"));
    }

    #[test]
    fn unpaid_sessions_decode_without_intent_or_details() {
        let body = r#"{ "id": "cs_test_9", "payment_intent": null, "payment_status": "unpaid" }"#;

        let session = parse_session(body.as_bytes()).expect("decodes");
        assert!(!session.paid);
        assert_eq!(session.payment_intent_id, None);
        assert_eq!(session.amount_cents, 0);
        assert_eq!(session.payer_email, None);
    }

    #[test]
    fn undecodable_sessions_map_to_decode_errors() {
        let error = parse_session(b"not json").expect_err("decode fails");
        assert!(matches!(error, PaymentGatewayError::Decode { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::conflict(StatusCode::CONFLICT, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_statuses_onto_gateway_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\":{\"message\":\"nope\"}}");
        let name = match error {
            PaymentGatewayError::Timeout { .. } => "Timeout",
            PaymentGatewayError::Rejected { .. } => "Rejected",
            PaymentGatewayError::Transport { .. } => "Transport",
            other => panic!("unexpected mapping: {other:?}"),
        };
        assert_eq!(name, expected);
    }

    #[test]
    fn retryability_tracks_transport_and_timeout_only() {
        assert!(map_status_error(StatusCode::GATEWAY_TIMEOUT, b"").is_retryable());
        assert!(map_status_error(StatusCode::BAD_GATEWAY, b"").is_retryable());
        assert!(!map_status_error(StatusCode::BAD_REQUEST, b"").is_retryable());
    }
}

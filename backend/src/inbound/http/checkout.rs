//! Checkout HTTP handlers.
//!
//! ```text
//! POST /api/v1/checkout/verify  Verify a payment session and fan out dispatch
//! ```
//!
//! Verification blocks on full dispatch and refund reconciliation; the
//! response carries the aggregate of every per-recipient attempt.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{VerifyCheckoutRequest, VerifyCheckoutResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_non_blank};

/// Request payload carrying the checkout redirect's session reference.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCheckoutRequestBody {
    pub session_id: String,
}

/// Aggregated verification and dispatch result.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCheckoutResponseBody {
    #[schema(format = "uuid")]
    pub order_id: String,
    pub paid: bool,
    pub sent: u32,
    pub failed: u32,
    pub total: u32,
    /// Refund issued for failed attempts, in cents.
    pub refund_cents: i64,
}

impl From<VerifyCheckoutResponse> for VerifyCheckoutResponseBody {
    fn from(value: VerifyCheckoutResponse) -> Self {
        Self {
            order_id: value.order_id.to_string(),
            paid: value.paid,
            sent: value.summary.sent,
            failed: value.summary.failed,
            total: value.summary.total,
            refund_cents: value.refund_cents,
        }
    }
}

/// Verify a payment session and dispatch the purchased postcards.
#[utoipa::path(
    post,
    path = "/api/v1/checkout/verify",
    request_body = VerifyCheckoutRequestBody,
    responses(
        (status = 200, description = "Verification settled", body = VerifyCheckoutResponseBody),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 404, description = "Session not found", body = crate::domain::Error),
        (status = 503, description = "Payment gateway unavailable", body = crate::domain::Error)
    ),
    tags = ["checkout"],
    operation_id = "verifyCheckout"
)]
#[post("/checkout/verify")]
pub async fn verify_checkout(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyCheckoutRequestBody>,
) -> ApiResult<web::Json<VerifyCheckoutResponseBody>> {
    let payload = payload.into_inner();
    require_non_blank(&payload.session_id, FieldName::new("sessionId"))?;

    let response = state
        .checkout
        .verify(VerifyCheckoutRequest {
            session_id: payload.session_id,
        })
        .await?;

    Ok(web::Json(VerifyCheckoutResponseBody::from(response)))
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;

//! Billing entities: customers, orders, postcards, and refund pricing.

pub mod pricing;
pub mod refund_key;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MailingAddress;
use crate::domain::NormalizedEmail;
use crate::domain::officials::OfficialSnapshot;

pub use pricing::refund_cents;
pub use refund_key::RefundKey;

/// Package purchased at checkout; determines recipient fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PackageTier {
    /// Representative only.
    Single,
    /// Representative plus one senator.
    Double,
    /// Representative plus every available senator.
    Triple,
}

impl PackageTier {
    /// Stable string form persisted in rows and carried in session metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
        }
    }

    /// Recipient count the tier sells, before any fan-out degradation.
    pub fn recipient_count(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

impl std::str::FromStr for PackageTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            "triple" => Ok(Self::Triple),
            other => Err(format!("unknown package tier: {other}")),
        }
    }
}

/// Settlement state of an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Stable string form persisted in database rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// A constituent identified by normalized email.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub email: NormalizedEmail,
    pub display_name: String,
    pub address: Option<MailingAddress>,
    /// Stable per-customer token minted at first upsert and preserved
    /// across later upserts.
    pub sharing_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload keyed on the normalized email.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerUpsert {
    pub email: NormalizedEmail,
    pub display_name: String,
    pub address: Option<MailingAddress>,
}

/// One paid (or audited-failed) purchase.
///
/// An order row exists for every verification attempt, including declined
/// payments, so billing history is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub draft_id: Option<Uuid>,
    pub tier: PackageTier,
    pub payment_status: PaymentStatus,
    pub payment_session_id: String,
    pub amount_paid_cents: i64,
    pub amount_refunded_cents: i64,
    /// Incremented as postcard rows are created for this order.
    pub postcard_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new order row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub draft_id: Option<Uuid>,
    pub tier: PackageTier,
    pub payment_status: PaymentStatus,
    pub payment_session_id: String,
    pub amount_paid_cents: i64,
}

/// Terminal delivery state of one dispatch attempt.
///
/// A failed attempt is terminal for its recipient within the order; there is
/// no automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Submitted,
    Mailed,
    Failed,
}

impl DeliveryStatus {
    /// Stable string form persisted in database rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Mailed => "mailed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "submitted" => Ok(Self::Submitted),
            "mailed" => Ok(Self::Mailed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown delivery status: {other}")),
        }
    }
}

/// One dispatch attempt toward the mail vendor, success or failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Postcard {
    pub id: Uuid,
    pub order_id: Uuid,
    pub recipient: OfficialSnapshot,
    pub message: String,
    pub template_id: String,
    pub vendor_order_id: Option<String>,
    pub vendor_error: Option<String>,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a postcard row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPostcard {
    pub id: Uuid,
    pub order_id: Uuid,
    pub recipient: OfficialSnapshot,
    pub message: String,
    pub template_id: String,
    pub vendor_order_id: Option<String>,
    pub vendor_error: Option<String>,
    pub status: DeliveryStatus,
}

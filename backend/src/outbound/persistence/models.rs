//! Row structs bridging Diesel tables and domain types.
//!
//! Recipient snapshots and mailing addresses are stored as Jsonb; decode
//! failures map to query errors at the call site rather than panicking.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{customers, draft_sources, drafts, orders, postcards};

/// Queryable customer row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub address: Option<serde_json::Value>,
    pub sharing_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable customer row used by the upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub address: Option<&'a serde_json::Value>,
    pub sharing_token: &'a str,
}

/// Changeset applied when the email already exists.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerUpdate<'a> {
    pub display_name: &'a str,
    pub address: Option<&'a serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

/// Queryable draft row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = drafts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DraftRow {
    pub id: Uuid,
    pub concerns: String,
    pub personal_impact: Option<String>,
    pub postal_code: String,
    pub recipient: serde_json::Value,
    pub status: String,
    pub message: String,
    pub approved_message: Option<String>,
    pub source_count: i32,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable draft row; attempts start pending with an empty message.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = drafts)]
pub(crate) struct NewDraftRow<'a> {
    pub id: Uuid,
    pub concerns: &'a str,
    pub personal_impact: Option<&'a str>,
    pub postal_code: &'a str,
    pub recipient: &'a serde_json::Value,
    pub status: &'a str,
    pub message: &'a str,
    pub source_count: i32,
}

/// Queryable draft source row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = draft_sources)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DraftSourceRow {
    #[expect(dead_code, reason = "surrogate key not exposed to the domain")]
    pub id: Uuid,
    #[expect(dead_code, reason = "filter column only")]
    pub draft_id: Uuid,
    pub ordinal: i32,
    pub url: String,
    pub outlet: String,
    pub summary: String,
}

/// Insertable draft source row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = draft_sources)]
pub(crate) struct NewDraftSourceRow<'a> {
    pub id: Uuid,
    pub draft_id: Uuid,
    pub ordinal: i32,
    pub url: &'a str,
    pub outlet: &'a str,
    pub summary: &'a str,
}

/// Queryable order row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub draft_id: Option<Uuid>,
    pub tier: String,
    pub payment_status: String,
    pub payment_session_id: String,
    pub amount_paid_cents: i64,
    pub amount_refunded_cents: i64,
    pub postcard_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable order row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub draft_id: Option<Uuid>,
    pub tier: &'a str,
    pub payment_status: &'a str,
    pub payment_session_id: &'a str,
    pub amount_paid_cents: i64,
    pub amount_refunded_cents: i64,
    pub postcard_count: i32,
}

/// Queryable postcard row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = postcards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostcardRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub recipient: serde_json::Value,
    pub message: String,
    pub template_id: String,
    pub vendor_order_id: Option<String>,
    pub vendor_error: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable postcard row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = postcards)]
pub(crate) struct NewPostcardRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub recipient: &'a serde_json::Value,
    pub message: &'a str,
    pub template_id: &'a str,
    pub vendor_order_id: Option<&'a str>,
    pub vendor_error: Option<&'a str>,
    pub status: &'a str,
}

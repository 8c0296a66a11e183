//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed schema exactly; Diesel uses them
//! for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Constituents, keyed by normalized email.
    customers (id) {
        id -> Uuid,
        /// Normalized email address; unique.
        email -> Varchar,
        display_name -> Varchar,
        /// Mailing address as Jsonb; null until a purchase supplies one.
        address -> Nullable<Jsonb>,
        /// Stable token minted at first insert; never rewritten on upsert.
        sharing_token -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per message generation attempt, including failed ones.
    drafts (id) {
        id -> Uuid,
        concerns -> Text,
        personal_impact -> Nullable<Text>,
        postal_code -> Varchar,
        /// Denormalized recipient snapshot as Jsonb.
        recipient -> Jsonb,
        /// Generation status: pending, success, error, approved.
        status -> Varchar,
        message -> Text,
        approved_message -> Nullable<Text>,
        source_count -> Int4,
        order_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Supporting sources attached to a draft, ordered by ordinal.
    draft_sources (id) {
        id -> Uuid,
        draft_id -> Uuid,
        ordinal -> Int4,
        url -> Text,
        outlet -> Varchar,
        summary -> Text,
    }
}

diesel::table! {
    /// One row per checkout verification, paid or failed.
    orders (id) {
        id -> Uuid,
        customer_id -> Uuid,
        draft_id -> Nullable<Uuid>,
        /// Package tier: single, double, triple.
        tier -> Varchar,
        /// Payment status: pending, paid, failed, refunded.
        payment_status -> Varchar,
        payment_session_id -> Varchar,
        amount_paid_cents -> Int8,
        amount_refunded_cents -> Int8,
        postcard_count -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per dispatch attempt toward the mail vendor.
    postcards (id) {
        id -> Uuid,
        order_id -> Uuid,
        /// Denormalized recipient snapshot as Jsonb.
        recipient -> Jsonb,
        message -> Text,
        template_id -> Varchar,
        vendor_order_id -> Nullable<Varchar>,
        vendor_error -> Nullable<Text>,
        /// Delivery status: submitted, mailed, failed.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(draft_sources -> drafts (draft_id));
diesel::joinable!(orders -> customers (customer_id));
diesel::joinable!(postcards -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(customers, drafts, draft_sources, orders, postcards);

//! Tests for checkout verification and fulfillment.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::location::{Jurisdiction, Location};
use crate::domain::officials::{OfficialKind, OfficialSnapshot};
use crate::domain::orders::DeliveryStatus;
use crate::domain::ports::{
    CivicLookupError, FixtureMailer, MailVendorError, MockCivicLookup, MockCustomerRepository,
    MockDraftRepository, MockMailVendor, MockOrderRepository, MockPaymentGateway,
    MockPostcardRepository, PrintTemplate,
};

const MESSAGE: &str =
    "Dear Budzinski,\nPlease act on prescription drug pricing.\nA constituent from Springfield";

fn official(name: &str, kind: OfficialKind) -> OfficialSnapshot {
    OfficialSnapshot {
        name: name.to_owned(),
        kind,
        office: Some(MailingAddress {
            line1: "1024 Longworth HOB".to_owned(),
            line2: None,
            city: "Washington".to_owned(),
            state: "DC".to_owned(),
            postal_code: "20515".to_owned(),
        }),
    }
}

fn springfield() -> Jurisdiction {
    Jurisdiction {
        location: Location {
            postal_code: "62701".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            region: "IL-13".to_owned(),
        },
        officials: vec![
            official("Nikki Budzinski", OfficialKind::Representative),
            official("Tammy Duckworth", OfficialKind::Senator),
            official("Dick Durbin", OfficialKind::Senator),
        ],
    }
}

fn metadata(draft_id: Option<Uuid>) -> serde_json::Value {
    json!({
        "message": MESSAGE,
        "tier": "triple",
        "postalCode": "62701",
        "draftId": draft_id,
        "senderName": "Jane Doe",
        "senderAddress": {
            "line1": "12 Elm St",
            "city": "Springfield",
            "state": "IL",
            "postalCode": "62701",
        },
    })
}

fn session(paid: bool, metadata: serde_json::Value) -> CheckoutSession {
    CheckoutSession {
        session_id: "cs_test_123".to_owned(),
        payment_intent_id: Some("pi_123".to_owned()),
        paid,
        amount_cents: 1200,
        payer_email: Some("Jane.Doe+ad@Gmail.com".to_owned()),
        payer_name: Some("Jane Doe".to_owned()),
        metadata,
    }
}

fn customer() -> Customer {
    Customer {
        id: Uuid::new_v4(),
        email: NormalizedEmail::parse("janedoe@gmail.com").expect("valid email"),
        display_name: "Jane Doe".to_owned(),
        address: None,
        sharing_token: "tok_abc".to_owned(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct Mocks {
    gateway: MockPaymentGateway,
    customers: MockCustomerRepository,
    orders: MockOrderRepository,
    drafts: MockDraftRepository,
    lookup: MockCivicLookup,
    vendor: MockMailVendor,
    postcards: MockPostcardRepository,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            gateway: MockPaymentGateway::new(),
            customers: MockCustomerRepository::new(),
            orders: MockOrderRepository::new(),
            drafts: MockDraftRepository::new(),
            lookup: MockCivicLookup::new(),
            vendor: MockMailVendor::new(),
            postcards: MockPostcardRepository::new(),
        }
    }
}

impl Mocks {
    fn into_service(self) -> CheckoutService {
        let orders: Arc<dyn OrderRepository> = Arc::new(self.orders);
        let gateway: Arc<dyn PaymentGateway> = Arc::new(self.gateway);
        let resolver = LocationResolver::new(Arc::new(self.lookup));
        let dispatcher = PostcardDispatcher::new(
            Arc::new(self.vendor),
            Arc::new(self.postcards),
            Arc::clone(&orders),
        );
        let reconciler = RefundReconciler::new(Arc::clone(&gateway), Arc::clone(&orders));
        CheckoutService::new(
            gateway,
            Arc::new(self.customers),
            orders,
            Arc::new(self.drafts),
            resolver,
            dispatcher,
            reconciler,
            Arc::new(FixtureMailer),
        )
    }
}

fn expect_order_insert(orders: &mut MockOrderRepository) {
    orders.expect_insert().times(1).returning(|new_order| {
        Ok(Order {
            id: new_order.id,
            customer_id: new_order.customer_id,
            draft_id: new_order.draft_id,
            tier: new_order.tier,
            payment_status: new_order.payment_status,
            payment_session_id: new_order.payment_session_id.clone(),
            amount_paid_cents: new_order.amount_paid_cents,
            amount_refunded_cents: 0,
            postcard_count: 0,
            created_at: Utc::now(),
        })
    });
}

#[tokio::test]
async fn unpaid_session_records_a_failed_order_without_dispatch() {
    let mut mocks = Mocks::default();
    mocks
        .gateway
        .expect_fetch_session()
        .times(1)
        .return_once(|_| Ok(session(false, metadata(None))));
    mocks.gateway.expect_refund().times(0);
    mocks
        .customers
        .expect_upsert()
        .times(1)
        .withf(|upsert| upsert.email.as_str() == "janedoe@gmail.com")
        .returning(|_| Ok(customer()));
    mocks.orders.expect_insert().times(1).returning(|new_order| {
        assert_eq!(new_order.payment_status, PaymentStatus::Failed);
        assert_eq!(new_order.amount_paid_cents, 0);
        Ok(Order {
            id: new_order.id,
            customer_id: new_order.customer_id,
            draft_id: None,
            tier: new_order.tier,
            payment_status: PaymentStatus::Failed,
            payment_session_id: new_order.payment_session_id.clone(),
            amount_paid_cents: 0,
            amount_refunded_cents: 0,
            postcard_count: 0,
            created_at: Utc::now(),
        })
    });
    mocks.vendor.expect_submit_postcard().times(0);

    let response = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_test_123".to_owned(),
        })
        .await
        .expect("verification settles");

    assert!(!response.paid);
    assert_eq!(response.summary, DispatchSummary::default());
    assert_eq!(response.refund_cents, 0);
}

#[tokio::test]
async fn paid_session_dispatches_links_the_draft_and_refunds_failures() {
    let draft_id = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks
        .gateway
        .expect_fetch_session()
        .times(1)
        .return_once(move |_| Ok(session(true, metadata(Some(draft_id)))));
    mocks
        .gateway
        .expect_refund()
        .times(1)
        .withf(|intent, amount, _| intent == "pi_123" && *amount == 400)
        .returning(|_, _, _| Ok(()));
    mocks
        .customers
        .expect_upsert()
        .times(1)
        .returning(|_| Ok(customer()));
    expect_order_insert(&mut mocks.orders);
    mocks
        .orders
        .expect_increment_postcard_count()
        .times(3)
        .returning(|_| Ok(()));
    mocks
        .orders
        .expect_record_refund()
        .times(1)
        .withf(|_, amount, status| *amount == 400 && *status == PaymentStatus::Paid)
        .returning(|_, _, _| Ok(()));
    mocks
        .drafts
        .expect_link_order()
        .times(1)
        .withf(move |linked_draft, _| *linked_draft == draft_id)
        .returning(|_, _| Ok(()));
    mocks
        .lookup
        .expect_lookup_postal_code()
        .returning(|_| Ok(springfield()));
    mocks.vendor.expect_list_templates().times(1).return_once(|| {
        Ok(vec![PrintTemplate {
            id: "tmpl_vendor_1".to_owned(),
            name: "Classic".to_owned(),
        }])
    });
    mocks.vendor.expect_submit_postcard().times(3).returning(|order| {
        if order.recipient_name.contains("Durbin") {
            Err(MailVendorError::rejected("address validation failed"))
        } else {
            Ok("vo_123".to_owned())
        }
    });
    mocks.postcards.expect_insert().times(3).returning(|row| {
        if row.recipient.name.contains("Durbin") {
            assert_eq!(row.status, DeliveryStatus::Failed);
        } else {
            assert_eq!(row.status, DeliveryStatus::Submitted);
        }
        Ok(())
    });

    let response = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_test_123".to_owned(),
        })
        .await
        .expect("verification settles");

    assert!(response.paid);
    assert_eq!(
        response.summary,
        DispatchSummary {
            sent: 2,
            failed: 1,
            total: 3
        }
    );
    assert_eq!(response.refund_cents, 400);
}

#[tokio::test]
async fn paid_order_with_no_resolvable_recipients_refunds_the_full_tier() {
    let mut mocks = Mocks::default();
    mocks
        .gateway
        .expect_fetch_session()
        .times(1)
        .return_once(|_| Ok(session(true, metadata(None))));
    mocks
        .customers
        .expect_upsert()
        .times(1)
        .returning(|_| Ok(customer()));
    expect_order_insert(&mut mocks.orders);
    mocks
        .lookup
        .expect_lookup_postal_code()
        .returning(|_| Err(CivicLookupError::transport("connection refused")));
    mocks.vendor.expect_list_templates().times(0);
    mocks.vendor.expect_submit_postcard().times(0);
    mocks.postcards.expect_insert().times(0);
    mocks.orders.expect_increment_postcard_count().times(0);
    mocks
        .gateway
        .expect_refund()
        .times(1)
        .withf(|intent, amount, _| intent == "pi_123" && *amount == 1200)
        .returning(|_, _, _| Ok(()));
    mocks
        .orders
        .expect_record_refund()
        .times(1)
        .withf(|_, amount, status| *amount == 1200 && *status == PaymentStatus::Refunded)
        .returning(|_, _, _| Ok(()));

    let response = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_test_123".to_owned(),
        })
        .await
        .expect("verification settles");

    assert!(response.paid);
    assert_eq!(
        response.summary,
        DispatchSummary {
            sent: 0,
            failed: 3,
            total: 3
        }
    );
    assert_eq!(response.refund_cents, 1200);
}

#[tokio::test]
async fn oversized_session_message_is_rejected_before_fulfillment() {
    let mut oversized = metadata(None);
    oversized["message"] = json!(format!(
        "Dear Budzinski,\n{}\nA constituent from Springfield",
        "x".repeat(300)
    ));
    let mut mocks = Mocks::default();
    mocks
        .gateway
        .expect_fetch_session()
        .times(1)
        .return_once(move |_| Ok(session(true, oversized)));
    mocks.customers.expect_upsert().times(0);
    mocks.vendor.expect_submit_postcard().times(0);

    let error = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_test_123".to_owned(),
        })
        .await
        .expect_err("message is over the ceiling");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details carry the field");
    assert_eq!(details["field"], "message");
}

#[tokio::test]
async fn unknown_session_maps_to_not_found() {
    let mut mocks = Mocks::default();
    mocks
        .gateway
        .expect_fetch_session()
        .times(1)
        .return_once(|_| Err(PaymentGatewayError::session_not_found("cs_missing")));

    let error = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_missing".to_owned(),
        })
        .await
        .expect_err("session is unknown");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn blank_session_id_is_rejected_before_the_gateway() {
    let mut mocks = Mocks::default();
    mocks.gateway.expect_fetch_session().times(0);

    let error = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "   ".to_owned(),
        })
        .await
        .expect_err("blank session id");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn malformed_metadata_is_an_invalid_request() {
    let mut mocks = Mocks::default();
    mocks
        .gateway
        .expect_fetch_session()
        .times(1)
        .return_once(|_| Ok(session(true, json!({ "tier": "gold" }))));

    let error = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_test_123".to_owned(),
        })
        .await
        .expect_err("metadata is malformed");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn missing_payer_email_is_an_invalid_request() {
    let mut mocks = Mocks::default();
    mocks.gateway.expect_fetch_session().times(1).return_once(|_| {
        let mut session = session(true, metadata(None));
        session.payer_email = None;
        Ok(session)
    });

    let error = mocks
        .into_service()
        .verify(VerifyCheckoutRequest {
            session_id: "cs_test_123".to_owned(),
        })
        .await
        .expect_err("payer email is required");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

//! Order fulfillment: recipient fan-out, postcard dispatch, and refund
//! reconciliation.
//!
//! Dispatch is an independent-attempt model. Each recipient gets exactly one
//! submission toward the mail vendor and exactly one persisted postcard row;
//! a failure on one recipient never blocks or rolls back the others.

pub mod refund;

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::MailingAddress;
use crate::domain::drafts::composer::{MESSAGE_HARD_CEILING, message_len};
use crate::domain::officials::{OfficialKind, OfficialSnapshot};
use crate::domain::orders::{DeliveryStatus, NewPostcard, Order, PackageTier};
use crate::domain::ports::{
    MailVendor, OrderRepository, PostcardOrder, PostcardRepository, PrintTemplate,
};

pub use refund::RefundReconciler;

/// Static fallback catalog used when the vendor's template listing fails.
const STATIC_TEMPLATES: &[&str] = &["tmpl_classic", "tmpl_flag", "tmpl_capitol"];

/// Character caps on the interpolated salutation name and signature, so the
/// personalized framing always leaves the body a positive length budget.
const SALUTATION_NAME_CAP: usize = 40;
const SIGNATURE_CAP: usize = 60;

/// Aggregate result of one dispatch run.
///
/// ## Invariants
/// - `sent + failed == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: u32,
    pub failed: u32,
    pub total: u32,
}

impl DispatchSummary {
    fn record_success(&mut self) {
        self.sent += 1;
        self.total += 1;
    }

    fn record_failure(&mut self) {
        self.failed += 1;
        self.total += 1;
    }
}

/// The paying sender whose name and return address go on each postcard.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderProfile {
    pub name: String,
    pub address: MailingAddress,
}

/// Expand a package tier into the ordered recipient set.
///
/// The representative always leads. Missing senators silently degrade the
/// set rather than failing the order.
pub fn expand_recipients(tier: PackageTier, officials: &[OfficialSnapshot]) -> Vec<OfficialSnapshot> {
    let representative = officials
        .iter()
        .find(|official| official.kind == OfficialKind::Representative);
    let senators = officials
        .iter()
        .filter(|official| official.kind == OfficialKind::Senator);

    let mut recipients: Vec<OfficialSnapshot> = representative.into_iter().cloned().collect();
    match tier {
        PackageTier::Single => {}
        PackageTier::Double => recipients.extend(senators.take(1).cloned()),
        PackageTier::Triple => recipients.extend(senators.cloned()),
    }
    recipients
}

/// Swap the generic salutation and signature lines for this recipient's
/// surname and the sender's real name, keeping the result under the
/// character ceiling.
///
/// Messages without the expected three-line shape pass through untouched;
/// the structural contract was already enforced at generation time.
pub fn personalize_message(
    message: &str,
    recipient: &OfficialSnapshot,
    sender: &SenderProfile,
) -> String {
    let lines: Vec<&str> = message.lines().collect();
    if lines.len() < 3 {
        return message.to_owned();
    }
    let name: String = recipient
        .salutation_name()
        .chars()
        .take(SALUTATION_NAME_CAP)
        .collect();
    let salutation = format!("Dear {name},");
    let signature = if sender.name.trim().is_empty() {
        lines[lines.len() - 1].to_owned()
    } else {
        sender.name.trim().chars().take(SIGNATURE_CAP).collect()
    };
    let body = lines[1..lines.len() - 1].join("\n");
    fit_to_ceiling(&salutation, &body, &signature)
}

/// Swapping in a longer surname or sender name can push an in-band message
/// over [`MESSAGE_HARD_CEILING`]; the body absorbs the difference so the
/// salutation and signature stay intact. The caps on the interpolated parts
/// keep the body budget positive, so the result is under the ceiling by
/// construction.
fn fit_to_ceiling(salutation: &str, body: &str, signature: &str) -> String {
    let framing = message_len(salutation) + message_len(signature) + 2;
    let budget = MESSAGE_HARD_CEILING.saturating_sub(framing);
    if message_len(body) > budget {
        let trimmed: String = body.chars().take(budget).collect();
        format!("{salutation}\n{}\n{signature}", trimmed.trim_end())
    } else {
        format!("{salutation}\n{body}\n{signature}")
    }
}

fn pick_template(templates: &[PrintTemplate]) -> String {
    let mut rng = rand::thread_rng();
    templates
        .choose(&mut rng)
        .map(|template| template.id.clone())
        .unwrap_or_else(|| static_template())
}

fn static_template() -> String {
    let mut rng = rand::thread_rng();
    (*STATIC_TEMPLATES
        .choose(&mut rng)
        .unwrap_or(&STATIC_TEMPLATES[0]))
    .to_owned()
}

/// Sequential per-recipient dispatcher behind checkout verification.
#[derive(Clone)]
pub struct PostcardDispatcher {
    vendor: Arc<dyn MailVendor>,
    postcards: Arc<dyn PostcardRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl PostcardDispatcher {
    pub fn new(
        vendor: Arc<dyn MailVendor>,
        postcards: Arc<dyn PostcardRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            vendor,
            postcards,
            orders,
        }
    }

    /// Submit one postcard per recipient, in order, recording every attempt.
    ///
    /// Attempts are deliberately sequential so partial-failure bookkeeping
    /// stays deterministic. Persistence failures are logged and do not alter
    /// the summary.
    pub async fn dispatch(
        &self,
        order: &Order,
        recipients: &[OfficialSnapshot],
        message: &str,
        sender: &SenderProfile,
    ) -> DispatchSummary {
        let templates = match self.vendor.list_templates().await {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => {
                warn!(order_id = %order.id, "vendor template catalog is empty");
                Vec::new()
            }
            Err(err) => {
                warn!(order_id = %order.id, %err, "vendor template catalog unavailable");
                Vec::new()
            }
        };

        let mut summary = DispatchSummary::default();
        for recipient in recipients {
            let outcome = self
                .dispatch_one(order, recipient, message, sender, &templates)
                .await;
            if outcome {
                summary.record_success();
            } else {
                summary.record_failure();
            }
        }
        summary
    }

    async fn dispatch_one(
        &self,
        order: &Order,
        recipient: &OfficialSnapshot,
        message: &str,
        sender: &SenderProfile,
        templates: &[PrintTemplate],
    ) -> bool {
        let personalized = personalize_message(message, recipient, sender);
        let template_id = pick_template(templates);

        let (vendor_order_id, vendor_error) = match &recipient.office {
            Some(address) => {
                let submission = PostcardOrder {
                    recipient_name: recipient.name.clone(),
                    recipient_address: address.clone(),
                    sender_name: sender.name.clone(),
                    sender_address: sender.address.clone(),
                    message: personalized.clone(),
                    template_id: template_id.clone(),
                };
                match self.vendor.submit_postcard(&submission).await {
                    Ok(vendor_order_id) => (Some(vendor_order_id), None),
                    Err(err) => {
                        warn!(order_id = %order.id, recipient = %recipient.name, %err,
                            "postcard submission failed");
                        (None, Some(err.to_string()))
                    }
                }
            }
            None => {
                warn!(order_id = %order.id, recipient = %recipient.name,
                    "recipient has no mailing address on file");
                (None, Some("no mailing address on file".to_owned()))
            }
        };

        let succeeded = vendor_order_id.is_some();
        let status = if succeeded {
            DeliveryStatus::Submitted
        } else {
            DeliveryStatus::Failed
        };
        let row = NewPostcard {
            id: Uuid::new_v4(),
            order_id: order.id,
            recipient: recipient.clone(),
            message: personalized,
            template_id,
            vendor_order_id,
            vendor_error,
            status,
        };
        if let Err(err) = self.postcards.insert(&row).await {
            error!(order_id = %order.id, recipient = %recipient.name, %err,
                "failed to persist postcard row");
        }
        if let Err(err) = self.orders.increment_postcard_count(order.id).await {
            error!(order_id = %order.id, %err, "failed to increment postcard count");
        }
        succeeded
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::orders::PaymentStatus;
    use crate::domain::ports::{MailVendorError, MockMailVendor, MockOrderRepository, MockPostcardRepository};

    fn representative() -> OfficialSnapshot {
        OfficialSnapshot {
            name: "Nikki Budzinski".to_owned(),
            kind: OfficialKind::Representative,
            office: Some(office("1024 Longworth HOB")),
        }
    }

    fn senator(name: &str) -> OfficialSnapshot {
        OfficialSnapshot {
            name: name.to_owned(),
            kind: OfficialKind::Senator,
            office: Some(office("Hart Senate Office Building")),
        }
    }

    fn office(line1: &str) -> MailingAddress {
        MailingAddress {
            line1: line1.to_owned(),
            line2: None,
            city: "Washington".to_owned(),
            state: "DC".to_owned(),
            postal_code: "20515".to_owned(),
        }
    }

    fn sender() -> SenderProfile {
        SenderProfile {
            name: "Jane Doe".to_owned(),
            address: MailingAddress {
                line1: "12 Elm St".to_owned(),
                line2: None,
                city: "Springfield".to_owned(),
                state: "IL".to_owned(),
                postal_code: "62701".to_owned(),
            },
        }
    }

    fn paid_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            draft_id: None,
            tier: PackageTier::Triple,
            payment_status: PaymentStatus::Paid,
            payment_session_id: "cs_test_123".to_owned(),
            amount_paid_cents: 1200,
            amount_refunded_cents: 0,
            postcard_count: 0,
            created_at: Utc::now(),
        }
    }

    const MESSAGE: &str = "Dear Budzinski,\nPlease act on drug pricing.\nA constituent from Springfield";

    #[rstest]
    #[case(PackageTier::Single, 2, 1)]
    #[case(PackageTier::Double, 2, 2)]
    #[case(PackageTier::Triple, 2, 3)]
    #[case(PackageTier::Double, 0, 1)]
    #[case(PackageTier::Triple, 0, 1)]
    fn expansion_follows_the_tier(
        #[case] tier: PackageTier,
        #[case] senators: usize,
        #[case] expected: usize,
    ) {
        let mut officials = vec![representative()];
        officials.extend(
            ["Tammy Duckworth", "Dick Durbin"]
                .iter()
                .take(senators)
                .map(|name| senator(name)),
        );

        let recipients = expand_recipients(tier, &officials);
        assert_eq!(recipients.len(), expected);
        assert_eq!(recipients[0].kind, OfficialKind::Representative);
    }

    #[test]
    fn personalization_swaps_salutation_and_signature() {
        let personalized = personalize_message(MESSAGE, &senator("Tammy Duckworth"), &sender());
        let lines: Vec<&str> = personalized.lines().collect();
        assert_eq!(lines[0], "Dear Duckworth,");
        assert_eq!(lines[1], "Please act on drug pricing.");
        assert_eq!(lines[2], "Jane Doe");
    }

    #[test]
    fn personalization_keeps_anonymous_signature_without_a_sender_name() {
        let anonymous = SenderProfile {
            name: "  ".to_owned(),
            ..sender()
        };
        let personalized = personalize_message(MESSAGE, &representative(), &anonymous);
        assert!(personalized.ends_with("A constituent from Springfield"));
    }

    #[test]
    fn personalization_cannot_push_the_message_over_the_ceiling() {
        let body = "x".repeat(243);
        let message = format!("Dear Budzinski,\n{body}\nA constituent from Springfield");
        assert_eq!(message_len(&message), MESSAGE_HARD_CEILING);

        let long_named = SenderProfile {
            name: "Alexandra Josephine Montgomery Fitzwilliam".to_owned(),
            ..sender()
        };
        let personalized = personalize_message(&message, &representative(), &long_named);

        assert!(message_len(&personalized) <= MESSAGE_HARD_CEILING);
        let lines: Vec<&str> = personalized.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Dear Budzinski,");
        assert_eq!(lines[2], "Alexandra Josephine Montgomery Fitzwilliam");
        assert!(!lines[1].is_empty());
    }

    #[test]
    fn oversized_sender_names_are_capped_in_the_signature() {
        let unbounded = SenderProfile {
            name: "Na ".repeat(40),
            ..sender()
        };
        let personalized = personalize_message(MESSAGE, &representative(), &unbounded);
        let signature = personalized.lines().last().unwrap_or_default();
        assert_eq!(message_len(signature), SIGNATURE_CAP);
        assert!(message_len(&personalized) <= MESSAGE_HARD_CEILING);
    }

    fn catalog() -> Vec<PrintTemplate> {
        vec![PrintTemplate {
            id: "tmpl_vendor_1".to_owned(),
            name: "Classic".to_owned(),
        }]
    }

    #[tokio::test]
    async fn one_failed_recipient_does_not_block_the_others() {
        let mut vendor = MockMailVendor::new();
        vendor
            .expect_list_templates()
            .times(1)
            .return_once(|| Ok(catalog()));
        vendor.expect_submit_postcard().times(3).returning(|order| {
            if order.recipient_name.contains("Durbin") {
                Err(MailVendorError::rejected("address validation failed"))
            } else {
                Ok("vo_123".to_owned())
            }
        });

        let mut postcards = MockPostcardRepository::new();
        postcards.expect_insert().times(3).returning(|row| {
            if row.recipient.name.contains("Durbin") {
                assert_eq!(row.status, DeliveryStatus::Failed);
                assert!(row.vendor_error.is_some());
            } else {
                assert_eq!(row.status, DeliveryStatus::Submitted);
                assert_eq!(row.vendor_order_id.as_deref(), Some("vo_123"));
            }
            Ok(())
        });

        let mut orders = MockOrderRepository::new();
        orders
            .expect_increment_postcard_count()
            .times(3)
            .returning(|_| Ok(()));

        let dispatcher = PostcardDispatcher::new(
            Arc::new(vendor),
            Arc::new(postcards),
            Arc::new(orders),
        );
        let recipients = vec![
            representative(),
            senator("Tammy Duckworth"),
            senator("Dick Durbin"),
        ];
        let summary = dispatcher
            .dispatch(&paid_order(), &recipients, MESSAGE, &sender())
            .await;

        assert_eq!(summary, DispatchSummary { sent: 2, failed: 1, total: 3 });
    }

    #[tokio::test]
    async fn catalog_failure_falls_back_to_static_templates() {
        let mut vendor = MockMailVendor::new();
        vendor
            .expect_list_templates()
            .times(1)
            .return_once(|| Err(MailVendorError::transport("connection refused")));
        vendor
            .expect_submit_postcard()
            .times(1)
            .returning(|order| {
                assert!(STATIC_TEMPLATES.contains(&order.template_id.as_str()));
                Ok("vo_456".to_owned())
            });

        let mut postcards = MockPostcardRepository::new();
        postcards.expect_insert().times(1).returning(|_| Ok(()));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_increment_postcard_count()
            .times(1)
            .returning(|_| Ok(()));

        let dispatcher = PostcardDispatcher::new(
            Arc::new(vendor),
            Arc::new(postcards),
            Arc::new(orders),
        );
        let summary = dispatcher
            .dispatch(&paid_order(), &[representative()], MESSAGE, &sender())
            .await;
        assert_eq!(summary.sent, 1);
    }

    #[tokio::test]
    async fn missing_recipient_address_records_a_failed_attempt() {
        let mut vendor = MockMailVendor::new();
        vendor
            .expect_list_templates()
            .times(1)
            .return_once(|| Ok(catalog()));
        vendor.expect_submit_postcard().times(0);

        let mut postcards = MockPostcardRepository::new();
        postcards.expect_insert().times(1).returning(|row| {
            assert_eq!(row.status, DeliveryStatus::Failed);
            Ok(())
        });
        let mut orders = MockOrderRepository::new();
        orders
            .expect_increment_postcard_count()
            .times(1)
            .returning(|_| Ok(()));

        let dispatcher = PostcardDispatcher::new(
            Arc::new(vendor),
            Arc::new(postcards),
            Arc::new(orders),
        );
        let recipient = OfficialSnapshot {
            office: None,
            ..representative()
        };
        let summary = dispatcher
            .dispatch(&paid_order(), &[recipient], MESSAGE, &sender())
            .await;
        assert_eq!(summary, DispatchSummary { sent: 0, failed: 1, total: 1 });
    }
}

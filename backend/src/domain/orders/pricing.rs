//! Tiered refund pricing.
//!
//! Amounts are integer cents throughout; the tiered table divides exactly,
//! so no floating point touches billing.

/// Flat price of a one-recipient order.
pub const SINGLE_PRICE_CENTS: i64 = 500;
/// Flat price of the full three-recipient set.
pub const TRIPLE_SET_PRICE_CENTS: i64 = 1200;
/// Per-recipient price outside the flat tiers.
pub const PER_RECIPIENT_PRICE_CENTS: i64 = 500;

/// Refund owed when `failed` of `total` dispatch attempts did not reach the
/// mail vendor.
///
/// The table is tiered, not per-unit uniform:
/// - one recipient: the $5 flat price refunds in full if that one fails;
/// - three recipients: the $12 set price refunds proportionally;
/// - any other count (mixed tier, degraded fan-out): $5 per failed card.
///
/// # Examples
/// ```
/// use backend::domain::orders::refund_cents;
///
/// assert_eq!(refund_cents(1, 1), 500);
/// assert_eq!(refund_cents(3, 1), 400);
/// assert_eq!(refund_cents(3, 3), 1200);
/// assert_eq!(refund_cents(2, 1), 500);
/// ```
pub fn refund_cents(total: u32, failed: u32) -> i64 {
    let failed = i64::from(failed.min(total));
    if failed == 0 {
        return 0;
    }
    match total {
        1 => SINGLE_PRICE_CENTS,
        3 => failed * TRIPLE_SET_PRICE_CENTS / 3,
        _ => failed * PER_RECIPIENT_PRICE_CENTS,
    }
}

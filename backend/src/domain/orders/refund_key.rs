//! Idempotency key for refund issuance.

use std::fmt;

use sha2::{Digest, Sha256};

/// Stable idempotency key derived from (payment session id, refund amount).
///
/// Passed verbatim to the payment processor's refund call so a retried
/// reconciliation for the same session and amount cannot create a second
/// refund. The derivation is a SHA-256 digest rather than string
/// concatenation so the key is fixed-width and free of delimiter ambiguity.
///
/// # Examples
/// ```
/// use backend::domain::orders::RefundKey;
///
/// let a = RefundKey::derive("cs_test_123", 400);
/// let b = RefundKey::derive("cs_test_123", 400);
/// assert_eq!(a, b);
/// assert_ne!(a, RefundKey::derive("cs_test_123", 500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefundKey(String);

impl RefundKey {
    /// Derive the key for one (session, amount) refund.
    pub fn derive(session_id: &str, amount_cents: i64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(session_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(amount_cents.to_be_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex form sent on the wire.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for RefundKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RefundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

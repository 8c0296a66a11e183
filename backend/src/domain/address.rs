//! Postal mailing addresses carried on customers and official snapshots.

use serde::{Deserialize, Serialize};

/// A parsed United States mailing address.
///
/// Stored denormalized (Jsonb) on customers and recipient snapshots, and
/// submitted verbatim to the print-and-mail vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl MailingAddress {
    /// Single-line rendering used in confirmation emails.
    pub fn single_line(&self) -> String {
        let mut parts = vec![self.line1.clone()];
        if let Some(line2) = &self.line2 {
            parts.push(line2.clone());
        }
        parts.push(format!("{}, {} {}", self.city, self.state, self.postal_code));
        parts.join(", ")
    }
}

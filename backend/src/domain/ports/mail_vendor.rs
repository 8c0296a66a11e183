//! Port for the print-and-mail vendor.

use async_trait::async_trait;

use crate::domain::MailingAddress;

/// Errors surfaced by mail vendor adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailVendorError {
    /// Network or protocol failure reaching the vendor.
    #[error("mail vendor transport failed: {message}")]
    Transport { message: String },
    /// The vendor rejected the submission.
    #[error("mail vendor rejected order: {message}")]
    Rejected { message: String },
    /// The vendor responded with an undecodable payload.
    #[error("mail vendor payload invalid: {message}")]
    Decode { message: String },
}

impl MailVendorError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// One entry in the vendor's print-template catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintTemplate {
    pub id: String,
    pub name: String,
}

/// One postcard submission toward the vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcardOrder {
    pub recipient_name: String,
    pub recipient_address: MailingAddress,
    pub sender_name: String,
    pub sender_address: MailingAddress,
    pub message: String,
    pub template_id: String,
}

/// Port over the vendor's template catalog and order submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailVendor: Send + Sync {
    /// Fetch the current template catalog.
    async fn list_templates(&self) -> Result<Vec<PrintTemplate>, MailVendorError>;

    /// Submit one postcard; returns the vendor's order id.
    async fn submit_postcard(&self, order: &PostcardOrder) -> Result<String, MailVendorError>;
}

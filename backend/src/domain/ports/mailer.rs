//! Port for the transactional email service.

use async_trait::async_trait;

/// Errors surfaced by mailer adapters. Callers treat sends as best-effort
/// and only log these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// Network or protocol failure reaching the email service.
    #[error("mailer transport failed: {message}")]
    Transport { message: String },
    /// The email service rejected the send.
    #[error("mailer rejected send: {message}")]
    Rejected { message: String },
}

impl MailerError {
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
}

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Fire-and-forget transactional email port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt one send.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}

/// Fixture implementation that accepts every send.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailer;

#[async_trait]
impl Mailer for FixtureMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), MailerError> {
        Ok(())
    }
}

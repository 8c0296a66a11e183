//! Reqwest-backed transactional email adapter.
//!
//! Sends are best-effort; callers log failures and move on, so the error
//! surface is deliberately small.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{EmailMessage, Mailer, MailerError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequestDto<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Transactional email adapter posting one send per call.
pub struct EmailHttpMailer {
    client: Client,
    endpoint: Url,
    api_key: String,
    from_address: String,
}

impl EmailHttpMailer {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: String,
        from_address: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            from_address,
        })
    }
}

#[async_trait]
impl Mailer for EmailHttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&SendRequestDto {
                from: &self.from_address,
                to: &message.to,
                subject: &message.subject,
                text: &message.body,
            })
            .send()
            .await
            .map_err(|error| MailerError::transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| MailerError::transport(error.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailerError {
    let preview = super::body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    if status.is_client_error() {
        MailerError::rejected(message)
    } else {
        MailerError::transport(message)
    }
}

//! Reqwest-backed print-and-mail vendor adapter.

mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{MailVendor, MailVendorError, PostcardOrder, PrintTemplate};

use dto::{SubmitOrderDto, SubmitResponseDto, TemplateListDto};

/// Mail vendor adapter over the vendor's HTTP API.
pub struct MailVendorHttpClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl MailVendorHttpClient {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn url(&self, path: &str) -> Result<Url, MailVendorError> {
        self.endpoint.join(path).map_err(|error| {
            MailVendorError::rejected(format!("invalid vendor url {path}: {error}"))
        })
    }
}

#[async_trait]
impl MailVendor for MailVendorHttpClient {
    async fn list_templates(&self) -> Result<Vec<PrintTemplate>, MailVendorError> {
        let url = self.url("templates")?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_templates(body.as_ref())
    }

    async fn submit_postcard(&self, order: &PostcardOrder) -> Result<String, MailVendorError> {
        let url = self.url("postcards")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&SubmitOrderDto::from_order(order))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_submission(body.as_ref())
    }
}

fn parse_templates(body: &[u8]) -> Result<Vec<PrintTemplate>, MailVendorError> {
    let decoded: TemplateListDto = serde_json::from_slice(body).map_err(|error| {
        MailVendorError::decode(format!("invalid template JSON payload: {error}"))
    })?;
    Ok(decoded.into_templates())
}

fn parse_submission(body: &[u8]) -> Result<String, MailVendorError> {
    let decoded: SubmitResponseDto = serde_json::from_slice(body).map_err(|error| {
        MailVendorError::decode(format!("invalid submission JSON payload: {error}"))
    })?;
    Ok(decoded.id)
}

fn map_transport_error(error: reqwest::Error) -> MailVendorError {
    MailVendorError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailVendorError {
    let preview = super::body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    if status.is_client_error() {
        MailVendorError::rejected(message)
    } else {
        MailVendorError::transport(message)
    }
}

//! Reqwest-backed web search adapter.

mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{SearchHit, WebSearch, WebSearchError};

use dto::SearchResponseDto;

/// Results requested per query; source discovery needs at most a handful.
const RESULT_LIMIT: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestDto<'a> {
    query: &'a str,
    limit: u32,
}

/// Web search adapter issuing one POST per query.
pub struct SearchHttpClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl SearchHttpClient {
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
}

#[async_trait]
impl WebSearch for SearchHttpClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, WebSearchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&SearchRequestDto {
                query,
                limit: RESULT_LIMIT,
            })
            .send()
            .await
            .map_err(|error| WebSearchError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| WebSearchError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_hits(body.as_ref())
    }
}

fn parse_hits(body: &[u8]) -> Result<Vec<SearchHit>, WebSearchError> {
    let decoded: SearchResponseDto = serde_json::from_slice(body).map_err(|error| {
        WebSearchError::decode(format!("invalid search JSON payload: {error}"))
    })?;
    Ok(decoded.into_hits())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WebSearchError {
    let preview = super::body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    WebSearchError::transport(message)
}

#[cfg(test)]
mod tests {
    //! Coverage for payload decoding.

    use super::*;

    #[test]
    fn result_lists_decode_in_provider_order() {
        let body = r#"{
            "results": [
                {
                    "url": "https://example-gazette.test/drug-costs",
                    "source": "Example Gazette",
                    "snippet": "Pharmacy closures doubled."
                },
                { "url": "https://wire.test/insulin" }
            ]
        }"#;

        let hits = parse_hits(body.as_bytes()).expect("decodes");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].outlet.as_deref(), Some("Example Gazette"));
        assert_eq!(hits[1].outlet, None);
        assert_eq!(hits[1].snippet, None);
    }

    #[test]
    fn missing_result_arrays_decode_as_empty() {
        let hits = parse_hits(b"{}").expect("decodes");
        assert!(hits.is_empty());
    }

    #[test]
    fn error_statuses_map_to_transport_with_preview() {
        let error = map_status_error(StatusCode::TOO_MANY_REQUESTS, b"quota exhausted");
        assert!(matches!(
            error,
            WebSearchError::Transport { ref message } if message.contains("quota exhausted")
        ));
    }
}

//! Reqwest-backed civic lookup adapter.
//!
//! This adapter owns transport details only: request shaping, timeout and
//! HTTP error mapping, and JSON decoding into the domain jurisdiction.

mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::location::Jurisdiction;
use crate::domain::ports::{CivicLookup, CivicLookupError};

use dto::LookupResponseDto;

/// Civic lookup adapter that queries one HTTP endpoint per postal code.
pub struct CivicHttpLookup {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl CivicHttpLookup {
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
impl CivicLookup for CivicHttpLookup {
    async fn lookup_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Jurisdiction, CivicLookupError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("postalCode", postal_code)])
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_jurisdiction(body.as_ref())
    }
}

fn parse_jurisdiction(body: &[u8]) -> Result<Jurisdiction, CivicLookupError> {
    let decoded: LookupResponseDto = serde_json::from_slice(body).map_err(|error| {
        CivicLookupError::decode(format!("invalid civic lookup JSON payload: {error}"))
    })?;
    decoded.into_jurisdiction().map_err(CivicLookupError::decode)
}

fn map_transport_error(error: reqwest::Error) -> CivicLookupError {
    // Lookup timeouts degrade to the unknown location upstream, so they map
    // to Transport rather than a dedicated variant.
    CivicLookupError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CivicLookupError {
    let preview = super::body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            CivicLookupError::invalid_postal_code(message)
        }
        _ => CivicLookupError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for non-network mapping helpers.

    use rstest::rstest;

    use super::*;
    use crate::domain::officials::OfficialKind;

    #[test]
    fn parses_lookup_json_into_a_jurisdiction() {
        let body = r#"{
            "location": {
                "postalCode": "62701",
                "city": "Springfield",
                "state": "IL",
                "district": "IL-13"
            },
            "officials": [
                {
                    "name": "Nikki Budzinski",
                    "kind": "representative",
                    "office": {
                        "line1": "1024 Longworth House Office Building",
                        "city": "Washington",
                        "state": "DC",
                        "postalCode": "20515"
                    }
                },
                { "name": "Tammy Duckworth", "kind": "senator", "office": null },
                { "name": "JB Pritzker", "kind": "governor", "office": null }
            ]
        }"#;

        let jurisdiction = parse_jurisdiction(body.as_bytes()).expect("decodes");
        assert_eq!(jurisdiction.location.city, "Springfield");
        assert_eq!(jurisdiction.location.region, "IL-13");
        // The governor entry is dropped; only addressable kinds survive.
        assert_eq!(jurisdiction.officials.len(), 2);
        assert_eq!(jurisdiction.officials[0].kind, OfficialKind::Representative);
        assert_eq!(
            jurisdiction.officials[0]
                .office
                .as_ref()
                .map(|office| office.city.as_str()),
            Some("Washington")
        );
    }

    #[test]
    fn undecodable_payloads_map_to_decode_errors() {
        let error = parse_jurisdiction(b"<html>offline</html>").expect_err("decode fails");
        assert!(matches!(error, CivicLookupError::Decode { .. }));
    }

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST, true)]
    #[case::not_found(StatusCode::NOT_FOUND, true)]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, true)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, false)]
    fn maps_statuses_onto_postal_or_transport_errors(
        #[case] status: StatusCode,
        #[case] is_postal: bool,
    ) {
        let error = map_status_error(status, b"{\"error\":\"unknown zip\"}");
        assert_eq!(
            matches!(error, CivicLookupError::InvalidPostalCode { .. }),
            is_postal
        );
    }
}

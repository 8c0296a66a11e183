//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Parse a UUID path or body value, naming the offending field on failure.
pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        Error::invalid_request(format!("{} must be a valid UUID", field.as_str())).with_details(
            json!({
                "field": field.as_str(),
                "code": "invalid_uuid",
            }),
        )
    })
}

/// Reject blank required string fields, naming the field.
pub(crate) fn require_non_blank(value: &str, field: FieldName) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(
            Error::invalid_request(format!("missing required field: {}", field.as_str()))
                .with_details(json!({
                    "field": field.as_str(),
                    "code": "missing_field",
                })),
        );
    }
    Ok(())
}

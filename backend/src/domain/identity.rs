//! Customer identity keyed on a normalized email address.
//!
//! Two raw strings that normalize identically must resolve to one customer
//! row, so the upsert key is always the normalized form, never the raw
//! input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Webmail providers whose local parts are dot-insensitive.
const DOT_INSENSITIVE_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

/// Validation errors for [`NormalizedEmail`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    #[error("email address must not be empty")]
    Empty,
    #[error("email address must contain a local part and a domain")]
    MissingParts,
}

/// Email identity canonicalized for customer deduplication.
///
/// Normalization applies, in order: whitespace trim, ASCII case folding,
/// sub-addressing suffix removal (`local+tag@` becomes `local@`), and dot
/// removal in the local part for known dot-insensitive webmail domains.
///
/// # Examples
/// ```
/// use backend::domain::NormalizedEmail;
///
/// let a = NormalizedEmail::parse("Jane.Q.Public+news@GMAIL.com").expect("valid");
/// let b = NormalizedEmail::parse("janeqpublic@gmail.com").expect("valid");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    /// Normalize and validate a raw email string.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }

        let lowered = trimmed.to_ascii_lowercase();
        let (local, domain) = lowered
            .split_once('@')
            .ok_or(EmailValidationError::MissingParts)?;
        if local.is_empty() || domain.is_empty() {
            return Err(EmailValidationError::MissingParts);
        }

        let local = local.split('+').next().unwrap_or(local);
        let local = if DOT_INSENSITIVE_DOMAINS.contains(&domain) {
            local.replace('.', "")
        } else {
            local.to_owned()
        };
        if local.is_empty() {
            return Err(EmailValidationError::MissingParts);
        }

        Ok(Self(format!("{local}@{domain}")))
    }

    /// Canonical string form used as the upsert key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for NormalizedEmail {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NormalizedEmail> for String {
    fn from(value: NormalizedEmail) -> Self {
        value.0
    }
}

//! Elected officials targeted by postcards.

use serde::{Deserialize, Serialize};

use crate::domain::MailingAddress;

/// Office held by a targeted official.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OfficialKind {
    Representative,
    Senator,
}

impl OfficialKind {
    /// Generic honorific used when an official's surname is unusable.
    pub fn generic_title(self) -> &'static str {
        match self {
            Self::Representative => "Representative",
            Self::Senator => "Senator",
        }
    }

    /// Stable string form persisted in database rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Representative => "representative",
            Self::Senator => "senator",
        }
    }
}

impl std::str::FromStr for OfficialKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "representative" => Ok(Self::Representative),
            "senator" => Ok(Self::Senator),
            other => Err(format!("unknown official kind: {other}")),
        }
    }
}

impl std::fmt::Display for OfficialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized copy of an official as known at generation or dispatch time.
///
/// Snapshots are persisted on drafts and postcards so later roster changes
/// never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficialSnapshot {
    pub name: String,
    pub kind: OfficialKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<MailingAddress>,
}

impl OfficialSnapshot {
    /// Surname used in the salutation line, when one can be derived.
    ///
    /// Returns `None` for blank or single-token names; callers fall back to
    /// the generic title for the office.
    pub fn surname(&self) -> Option<&str> {
        let mut parts = self.name.split_whitespace().filter(|part| {
            // Skip suffixes so "Maria Cantwell Jr." salutes Cantwell.
            !matches!(*part, "Jr." | "Sr." | "II" | "III" | "IV")
        });
        parts.next()?;
        parts.last()
    }

    /// Salutation name: surname when derivable, generic title otherwise.
    pub fn salutation_name(&self) -> &str {
        self.surname().unwrap_or_else(|| self.kind.generic_title())
    }
}

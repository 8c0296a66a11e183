//! Draft generation: entities, theme analysis, source discovery, and the
//! composer that enforces the printable-message contract.

pub mod composer;
pub mod service;
pub mod sources;
pub mod theme;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::officials::OfficialSnapshot;

pub use composer::{
    ComposedMessage, DraftComposer, FallbackReason, MESSAGE_HARD_CEILING, MessagePath,
};
pub use service::DraftGenerationService;
pub use sources::{OutletRank, SourceDiscovery};
pub use theme::{ThemeAnalysis, ThemeContractViolation};

/// Lifecycle state of one generation attempt.
///
/// Every attempt persists a row: `Pending` at creation, then `Success` or
/// `Error` once generation settles, and `Approved` only after a human edits
/// the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Success,
    Error,
    Approved,
}

impl GenerationStatus {
    /// Stable string form persisted in database rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
            Self::Approved => "approved",
        }
    }
}

impl std::str::FromStr for GenerationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "approved" => Ok(Self::Approved),
            other => Err(format!("unknown generation status: {other}")),
        }
    }
}

/// One persisted message-generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: Uuid,
    pub concerns: String,
    pub personal_impact: Option<String>,
    pub postal_code: String,
    pub recipient: OfficialSnapshot,
    pub status: GenerationStatus,
    pub message: String,
    /// Set only when a person edits and approves the generated text.
    pub approved_message: Option<String>,
    pub source_count: i32,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Text that would be printed today: the human-approved edit when one
    /// exists, the generated message otherwise.
    pub fn printable_message(&self) -> &str {
        self.approved_message.as_deref().unwrap_or(&self.message)
    }
}

/// Fields fixed at draft creation; the row starts `Pending` with an empty
/// message.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDraft {
    pub id: Uuid,
    pub concerns: String,
    pub personal_impact: Option<String>,
    pub postal_code: String,
    pub recipient: OfficialSnapshot,
}

/// A credibility-ranked reference attached to a draft.
///
/// At most four per draft; `ordinal` is 1-based and unique per draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSource {
    pub ordinal: i32,
    pub url: String,
    pub outlet: String,
    pub summary: String,
}

/// Upper bound on sources attached to one draft.
pub const MAX_SOURCES_PER_DRAFT: usize = 4;

//! Driving port for the message-generation pipeline.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::drafts::{Draft, DraftSource, GenerationStatus};
use crate::domain::location::Location;
use crate::domain::officials::OfficialKind;

/// Inputs to one generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateDraftRequest {
    pub concerns: String,
    pub personal_impact: Option<String>,
    pub postal_code: String,
    pub recipient_kind: OfficialKind,
}

/// Result of one generation attempt. A response is returned even when the
/// pipeline degraded to the fallback message; `status` carries the truth.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateDraftResponse {
    pub draft_id: Uuid,
    pub status: GenerationStatus,
    pub message: String,
    pub location: Location,
    pub sources: Vec<DraftSource>,
}

/// Human-edited replacement for the generated message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproveDraftRequest {
    pub draft_id: Uuid,
    pub message: String,
}

/// Confirmation that the edit was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproveDraftResponse {
    pub draft_id: Uuid,
    pub status: GenerationStatus,
}

/// A draft together with its attached sources.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftWithSources {
    pub draft: Draft,
    pub sources: Vec<DraftSource>,
}

/// Use-cases exposed to inbound adapters for drafts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftGeneration: Send + Sync {
    /// Run the full generation pipeline and persist the attempt.
    async fn generate(&self, request: GenerateDraftRequest)
    -> Result<GenerateDraftResponse, Error>;

    /// Store a human-approved edit, enforcing the message ceiling.
    async fn approve(&self, request: ApproveDraftRequest) -> Result<ApproveDraftResponse, Error>;

    /// Fetch a draft with its sources.
    async fn get(&self, draft_id: Uuid) -> Result<DraftWithSources, Error>;
}

/// Fixture implementation for handler tests that never reach generation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDraftGeneration;

#[async_trait]
impl DraftGeneration for FixtureDraftGeneration {
    async fn generate(
        &self,
        request: GenerateDraftRequest,
    ) -> Result<GenerateDraftResponse, Error> {
        Ok(GenerateDraftResponse {
            draft_id: Uuid::new_v4(),
            status: GenerationStatus::Success,
            message: String::new(),
            location: Location::unknown(request.postal_code),
            sources: Vec::new(),
        })
    }

    async fn approve(&self, request: ApproveDraftRequest) -> Result<ApproveDraftResponse, Error> {
        Ok(ApproveDraftResponse {
            draft_id: request.draft_id,
            status: GenerationStatus::Approved,
        })
    }

    async fn get(&self, draft_id: Uuid) -> Result<DraftWithSources, Error> {
        Err(Error::not_found(format!("draft {draft_id} not found")))
    }
}

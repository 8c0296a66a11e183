//! Draft generation domain service.
//!
//! Implements the [`DraftGeneration`] driving port: resolve the
//! jurisdiction, reduce concerns to one theme, discover sources, compose a
//! contract-obeying message, and persist the attempt whatever happened.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::drafts::composer::{DraftComposer, MESSAGE_HARD_CEILING, fallback_message, message_len};
use crate::domain::drafts::sources::SourceDiscovery;
use crate::domain::drafts::{Draft, GenerationStatus, NewDraft, ThemeAnalysis};
use crate::domain::location::{Jurisdiction, LocationResolver};
use crate::domain::officials::{OfficialKind, OfficialSnapshot};
use crate::domain::ports::{
    ApproveDraftRequest, ApproveDraftResponse, ComposeRequest, DraftGeneration,
    DraftRepository, DraftRepositoryError, DraftWithSources, GenerateDraftRequest,
    GenerateDraftResponse, LanguageModel, ThemeRequest,
};

fn map_repository_error(error: DraftRepositoryError) -> Error {
    match error {
        DraftRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("draft repository unavailable: {message}"))
        }
        DraftRepositoryError::Query { message } => {
            Error::internal(format!("draft repository error: {message}"))
        }
    }
}

/// Anonymized signature used before a paying sender is known.
pub fn anonymous_signature(city: &str) -> String {
    if city.is_empty() {
        "A concerned constituent".to_owned()
    } else {
        format!("A constituent from {city}")
    }
}

/// Full generation pipeline behind the [`DraftGeneration`] port.
#[derive(Clone)]
pub struct DraftGenerationService {
    drafts: Arc<dyn DraftRepository>,
    resolver: LocationResolver,
    model: Arc<dyn LanguageModel>,
    discovery: SourceDiscovery,
    composer: DraftComposer,
}

impl DraftGenerationService {
    pub fn new(
        drafts: Arc<dyn DraftRepository>,
        resolver: LocationResolver,
        model: Arc<dyn LanguageModel>,
        discovery: SourceDiscovery,
    ) -> Self {
        let composer = DraftComposer::new(Arc::clone(&model));
        Self {
            drafts,
            resolver,
            model,
            discovery,
            composer,
        }
    }

    fn recipient_for(jurisdiction: &Jurisdiction, kind: OfficialKind) -> OfficialSnapshot {
        jurisdiction
            .officials
            .iter()
            .find(|official| official.kind == kind)
            .cloned()
            .unwrap_or(OfficialSnapshot {
                name: String::new(),
                kind,
                office: None,
            })
    }

    /// Persist the attempt outcome; failures are logged, never surfaced, so
    /// the caller still receives a usable message.
    async fn record_outcome_best_effort(
        &self,
        draft_id: Uuid,
        status: GenerationStatus,
        message: &str,
        source_count: i32,
    ) {
        if let Err(err) = self
            .drafts
            .record_outcome(draft_id, status, message, source_count)
            .await
        {
            error!(%draft_id, %err, "failed to persist draft outcome");
        }
    }
}

#[async_trait]
impl DraftGeneration for DraftGenerationService {
    async fn generate(
        &self,
        request: GenerateDraftRequest,
    ) -> Result<GenerateDraftResponse, Error> {
        if request.concerns.trim().is_empty() {
            return Err(
                Error::invalid_request("missing required field: concerns")
                    .with_details(json!({ "field": "concerns" })),
            );
        }
        if request.postal_code.trim().is_empty() {
            return Err(
                Error::invalid_request("missing required field: postalCode")
                    .with_details(json!({ "field": "postalCode" })),
            );
        }

        let jurisdiction = self.resolver.resolve_or_unknown(&request.postal_code).await;
        let recipient = Self::recipient_for(&jurisdiction, request.recipient_kind);
        let location = jurisdiction.location.clone();
        let salutation_name = recipient.salutation_name().to_owned();
        let signature = anonymous_signature(&location.city);

        let draft_id = Uuid::new_v4();
        let new_draft = NewDraft {
            id: draft_id,
            concerns: request.concerns.clone(),
            personal_impact: request.personal_impact.clone(),
            postal_code: request.postal_code.clone(),
            recipient: recipient.clone(),
        };
        if let Err(err) = self.drafts.create(&new_draft).await {
            // The attempt continues; a usable message beats a stored row.
            error!(%draft_id, %err, "failed to persist pending draft");
        }

        let theme_request = ThemeRequest {
            concerns: request.concerns.clone(),
            personal_impact: request.personal_impact.clone(),
            location: location.clone(),
        };
        let theme = match self.model.analyze_theme(&theme_request).await {
            Ok(outcome) => match ThemeAnalysis::from_outcome(outcome) {
                Ok(theme) => theme,
                Err(violation) => {
                    warn!(%draft_id, %violation, "theme contract violated");
                    let message =
                        fallback_message(&request.concerns, &location, &salutation_name, &signature);
                    self.record_outcome_best_effort(draft_id, GenerationStatus::Error, &message, 0)
                        .await;
                    return Ok(GenerateDraftResponse {
                        draft_id,
                        status: GenerationStatus::Error,
                        message,
                        location,
                        sources: Vec::new(),
                    });
                }
            },
            Err(err) => {
                warn!(%draft_id, %err, "theme analysis failed");
                let message =
                    fallback_message(&request.concerns, &location, &salutation_name, &signature);
                self.record_outcome_best_effort(draft_id, GenerationStatus::Error, &message, 0)
                    .await;
                return Ok(GenerateDraftResponse {
                    draft_id,
                    status: GenerationStatus::Error,
                    message,
                    location,
                    sources: Vec::new(),
                });
            }
        };

        let sources = self.discovery.discover(&theme, &location).await;

        let compose_request = ComposeRequest {
            concerns: request.concerns,
            personal_impact: request.personal_impact,
            theme,
            location: location.clone(),
            salutation_name,
            signature,
            source_summaries: sources.iter().map(|s| s.summary.clone()).collect(),
        };
        let composed = self.composer.compose(&compose_request).await;
        let status = if composed.is_degraded() {
            GenerationStatus::Error
        } else {
            GenerationStatus::Success
        };

        if !sources.is_empty() {
            if let Err(err) = self.drafts.insert_sources(draft_id, &sources).await {
                error!(%draft_id, %err, "failed to persist draft sources");
            }
        }
        let source_count = i32::try_from(sources.len()).unwrap_or(0);
        self.record_outcome_best_effort(draft_id, status, &composed.text, source_count)
            .await;

        info!(
            %draft_id,
            status = status.as_str(),
            chars = message_len(&composed.text),
            sources = sources.len(),
            "draft generation settled"
        );
        Ok(GenerateDraftResponse {
            draft_id,
            status,
            message: composed.text,
            location,
            sources,
        })
    }

    async fn approve(&self, request: ApproveDraftRequest) -> Result<ApproveDraftResponse, Error> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(Error::invalid_request("missing required field: message")
                .with_details(json!({ "field": "message" })));
        }
        let chars = message_len(message);
        if chars > MESSAGE_HARD_CEILING {
            return Err(Error::invalid_request(format!(
                "message exceeds the {MESSAGE_HARD_CEILING}-character ceiling"
            ))
            .with_details(json!({
                "field": "message",
                "chars": chars,
                "ceiling": MESSAGE_HARD_CEILING,
            })));
        }

        let updated = self
            .drafts
            .approve(request.draft_id, message)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("draft {} not found", request.draft_id)))?;

        Ok(ApproveDraftResponse {
            draft_id: updated.id,
            status: updated.status,
        })
    }

    async fn get(&self, draft_id: Uuid) -> Result<DraftWithSources, Error> {
        let draft: Draft = self
            .drafts
            .find_by_id(draft_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("draft {draft_id} not found")))?;
        let sources = self
            .drafts
            .list_sources(draft_id)
            .await
            .map_err(map_repository_error)?;

        Ok(DraftWithSources { draft, sources })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

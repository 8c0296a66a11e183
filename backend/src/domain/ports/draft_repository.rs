//! Port for draft and source persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::drafts::{Draft, DraftSource, GenerationStatus, NewDraft};

/// Errors raised by draft repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftRepositoryError {
    /// Repository connection could not be established.
    #[error("draft repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("draft repository query failed: {message}")]
    Query { message: String },
}

impl DraftRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port persisting every generation attempt, successful or not.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Insert a pending draft row before generation runs.
    async fn create(&self, draft: &NewDraft) -> Result<(), DraftRepositoryError>;

    /// Record the outcome of the generation attempt on an existing row.
    async fn record_outcome(
        &self,
        draft_id: Uuid,
        status: GenerationStatus,
        message: &str,
        source_count: i32,
    ) -> Result<(), DraftRepositoryError>;

    /// Store the human-edited message; returns the updated draft, or `None`
    /// when the draft does not exist.
    async fn approve(
        &self,
        draft_id: Uuid,
        approved_message: &str,
    ) -> Result<Option<Draft>, DraftRepositoryError>;

    /// Link the draft to the order that paid for it.
    async fn link_order(&self, draft_id: Uuid, order_id: Uuid)
    -> Result<(), DraftRepositoryError>;

    /// Fetch one draft.
    async fn find_by_id(&self, draft_id: Uuid) -> Result<Option<Draft>, DraftRepositoryError>;

    /// Attach discovered sources; ordinals are unique per draft.
    async fn insert_sources(
        &self,
        draft_id: Uuid,
        sources: &[DraftSource],
    ) -> Result<(), DraftRepositoryError>;

    /// List sources for a draft in ordinal order.
    async fn list_sources(&self, draft_id: Uuid) -> Result<Vec<DraftSource>, DraftRepositoryError>;
}

/// Fixture implementation for tests that do not exercise draft persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDraftRepository;

#[async_trait]
impl DraftRepository for FixtureDraftRepository {
    async fn create(&self, _draft: &NewDraft) -> Result<(), DraftRepositoryError> {
        Ok(())
    }

    async fn record_outcome(
        &self,
        _draft_id: Uuid,
        _status: GenerationStatus,
        _message: &str,
        _source_count: i32,
    ) -> Result<(), DraftRepositoryError> {
        Ok(())
    }

    async fn approve(
        &self,
        _draft_id: Uuid,
        _approved_message: &str,
    ) -> Result<Option<Draft>, DraftRepositoryError> {
        Ok(None)
    }

    async fn link_order(
        &self,
        _draft_id: Uuid,
        _order_id: Uuid,
    ) -> Result<(), DraftRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _draft_id: Uuid) -> Result<Option<Draft>, DraftRepositoryError> {
        Ok(None)
    }

    async fn insert_sources(
        &self,
        _draft_id: Uuid,
        _sources: &[DraftSource],
    ) -> Result<(), DraftRepositoryError> {
        Ok(())
    }

    async fn list_sources(
        &self,
        _draft_id: Uuid,
    ) -> Result<Vec<DraftSource>, DraftRepositoryError> {
        Ok(Vec::new())
    }
}

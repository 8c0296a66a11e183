//! PostgreSQL-backed [`DraftRepository`] implementation using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::drafts::{Draft, DraftSource, GenerationStatus, NewDraft};
use crate::domain::officials::OfficialSnapshot;
use crate::domain::ports::{DraftRepository, DraftRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DraftRow, DraftSourceRow, NewDraftRow, NewDraftSourceRow};
use super::pool::{DbPool, PoolError};
use super::schema::{draft_sources, drafts};

/// Diesel-backed implementation of the draft repository port.
#[derive(Clone)]
pub struct DieselDraftRepository {
    pool: DbPool,
}

impl DieselDraftRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DraftRepositoryError {
    map_pool_error(error, DraftRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DraftRepositoryError {
    map_diesel_error(
        error,
        DraftRepositoryError::query,
        DraftRepositoryError::connection,
    )
}

fn encode_recipient(recipient: &OfficialSnapshot) -> Result<serde_json::Value, DraftRepositoryError> {
    serde_json::to_value(recipient)
        .map_err(|err| DraftRepositoryError::query(format!("serialise recipient: {err}")))
}

fn row_to_draft(row: DraftRow) -> Result<Draft, DraftRepositoryError> {
    let recipient: OfficialSnapshot = serde_json::from_value(row.recipient)
        .map_err(|err| DraftRepositoryError::query(format!("decode recipient: {err}")))?;
    let status = row
        .status
        .parse::<GenerationStatus>()
        .map_err(DraftRepositoryError::query)?;

    Ok(Draft {
        id: row.id,
        concerns: row.concerns,
        personal_impact: row.personal_impact,
        postal_code: row.postal_code,
        recipient,
        status,
        message: row.message,
        approved_message: row.approved_message,
        source_count: row.source_count,
        order_id: row.order_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_source(row: DraftSourceRow) -> DraftSource {
    DraftSource {
        ordinal: row.ordinal,
        url: row.url,
        outlet: row.outlet,
        summary: row.summary,
    }
}

#[async_trait]
impl DraftRepository for DieselDraftRepository {
    async fn create(&self, draft: &NewDraft) -> Result<(), DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let recipient = encode_recipient(&draft.recipient)?;

        let row = NewDraftRow {
            id: draft.id,
            concerns: &draft.concerns,
            personal_impact: draft.personal_impact.as_deref(),
            postal_code: &draft.postal_code,
            recipient: &recipient,
            status: GenerationStatus::Pending.as_str(),
            message: "",
            source_count: 0,
        };

        diesel::insert_into(drafts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn record_outcome(
        &self,
        draft_id: Uuid,
        status: GenerationStatus,
        message: &str,
        source_count: i32,
    ) -> Result<(), DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(drafts::table.filter(drafts::id.eq(draft_id)))
            .set((
                drafts::status.eq(status.as_str()),
                drafts::message.eq(message),
                drafts::source_count.eq(source_count),
                drafts::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn approve(
        &self,
        draft_id: Uuid,
        message: &str,
    ) -> Result<Option<Draft>, DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = diesel::update(drafts::table.filter(drafts::id.eq(draft_id)))
            .set((
                drafts::approved_message.eq(message),
                drafts::status.eq(GenerationStatus::Approved.as_str()),
                drafts::updated_at.eq(Utc::now()),
            ))
            .returning(DraftRow::as_returning())
            .get_result::<DraftRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_draft).transpose()
    }

    async fn link_order(&self, draft_id: Uuid, order_id: Uuid) -> Result<(), DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(drafts::table.filter(drafts::id.eq(draft_id)))
            .set((
                drafts::order_id.eq(order_id),
                drafts::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, draft_id: Uuid) -> Result<Option<Draft>, DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = drafts::table
            .filter(drafts::id.eq(draft_id))
            .select(DraftRow::as_select())
            .first::<DraftRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_draft).transpose()
    }

    async fn insert_sources(
        &self,
        draft_id: Uuid,
        sources: &[DraftSource],
    ) -> Result<(), DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<NewDraftSourceRow<'_>> = sources
            .iter()
            .map(|source| NewDraftSourceRow {
                id: Uuid::new_v4(),
                draft_id,
                ordinal: source.ordinal,
                url: &source.url,
                outlet: &source.outlet,
                summary: &source.summary,
            })
            .collect();

        diesel::insert_into(draft_sources::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_sources(&self, draft_id: Uuid) -> Result<Vec<DraftSource>, DraftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<DraftSourceRow> = draft_sources::table
            .filter(draft_sources::draft_id.eq(draft_id))
            .order(draft_sources::ordinal.asc())
            .select(DraftSourceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows.into_iter().map(row_to_source).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::officials::OfficialKind;

    fn row(status: &str) -> DraftRow {
        DraftRow {
            id: Uuid::new_v4(),
            concerns: "drug costs".to_owned(),
            personal_impact: None,
            postal_code: "62701".to_owned(),
            recipient: serde_json::json!({
                "name": "Nikki Budzinski",
                "kind": "representative",
            }),
            status: status.to_owned(),
            message: "generated".to_owned(),
            approved_message: None,
            source_count: 2,
            order_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rows_decode_into_domain_drafts() {
        let draft = row_to_draft(row("success")).expect("decodes");
        assert_eq!(draft.status, GenerationStatus::Success);
        assert_eq!(draft.recipient.kind, OfficialKind::Representative);
        assert_eq!(draft.source_count, 2);
    }

    #[test]
    fn unknown_status_strings_surface_as_query_errors() {
        let error = row_to_draft(row("draughty")).expect_err("invalid status");
        assert!(matches!(error, DraftRepositoryError::Query { .. }));
    }
}

//! PostgreSQL-backed [`PostcardRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::officials::OfficialSnapshot;
use crate::domain::orders::{DeliveryStatus, NewPostcard, Postcard};
use crate::domain::ports::{PostcardRepository, PostcardRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPostcardRow, PostcardRow};
use super::pool::{DbPool, PoolError};
use super::schema::postcards;

/// Diesel-backed implementation of the postcard repository port.
#[derive(Clone)]
pub struct DieselPostcardRepository {
    pool: DbPool,
}

impl DieselPostcardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PostcardRepositoryError {
    map_pool_error(error, PostcardRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PostcardRepositoryError {
    map_diesel_error(
        error,
        PostcardRepositoryError::query,
        PostcardRepositoryError::connection,
    )
}

fn encode_recipient(
    recipient: &OfficialSnapshot,
) -> Result<serde_json::Value, PostcardRepositoryError> {
    serde_json::to_value(recipient)
        .map_err(|err| PostcardRepositoryError::query(format!("recipient encode failed: {err}")))
}

fn row_to_postcard(row: PostcardRow) -> Result<Postcard, PostcardRepositoryError> {
    let recipient: OfficialSnapshot = serde_json::from_value(row.recipient)
        .map_err(|err| PostcardRepositoryError::query(format!("recipient decode failed: {err}")))?;
    let status = row
        .status
        .parse::<DeliveryStatus>()
        .map_err(PostcardRepositoryError::query)?;

    Ok(Postcard {
        id: row.id,
        order_id: row.order_id,
        recipient,
        message: row.message,
        template_id: row.template_id,
        vendor_order_id: row.vendor_order_id,
        vendor_error: row.vendor_error,
        status,
        created_at: row.created_at,
    })
}

#[async_trait]
impl PostcardRepository for DieselPostcardRepository {
    async fn insert(&self, postcard: &NewPostcard) -> Result<(), PostcardRepositoryError> {
        let recipient = encode_recipient(&postcard.recipient)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewPostcardRow {
            id: postcard.id,
            order_id: postcard.order_id,
            recipient: &recipient,
            message: &postcard.message,
            template_id: &postcard.template_id,
            vendor_order_id: postcard.vendor_order_id.as_deref(),
            vendor_error: postcard.vendor_error.as_deref(),
            status: postcard.status.as_str(),
        };

        diesel::insert_into(postcards::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<Postcard>, PostcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows = postcards::table
            .filter(postcards::order_id.eq(order_id))
            .order(postcards::created_at.asc())
            .select(PostcardRow::as_select())
            .load::<PostcardRow>(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_postcard).collect()
    }
}

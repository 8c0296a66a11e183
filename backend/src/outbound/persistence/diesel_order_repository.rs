//! PostgreSQL-backed [`OrderRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::orders::{NewOrder, Order, PackageTier, PaymentStatus};
use crate::domain::ports::{OrderRepository, OrderRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewOrderRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> OrderRepositoryError {
    map_pool_error(error, OrderRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    let tier = row
        .tier
        .parse::<PackageTier>()
        .map_err(OrderRepositoryError::query)?;
    let payment_status = row
        .payment_status
        .parse::<PaymentStatus>()
        .map_err(OrderRepositoryError::query)?;

    Ok(Order {
        id: row.id,
        customer_id: row.customer_id,
        draft_id: row.draft_id,
        tier,
        payment_status,
        payment_session_id: row.payment_session_id,
        amount_paid_cents: row.amount_paid_cents,
        amount_refunded_cents: row.amount_refunded_cents,
        postcard_count: row.postcard_count,
        created_at: row.created_at,
    })
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewOrderRow {
            id: order.id,
            customer_id: order.customer_id,
            draft_id: order.draft_id,
            tier: order.tier.as_str(),
            payment_status: order.payment_status.as_str(),
            payment_session_id: &order.payment_session_id,
            amount_paid_cents: order.amount_paid_cents,
            amount_refunded_cents: 0,
            postcard_count: 0,
        };

        let inserted = diesel::insert_into(orders::table)
            .values(&row)
            .returning(OrderRow::as_returning())
            .get_result::<OrderRow>(&mut conn)
            .await
            .map_err(diesel_error)?;

        row_to_order(inserted)
    }

    async fn increment_postcard_count(&self, order_id: Uuid) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set(orders::postcard_count.eq(orders::postcard_count + 1))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn record_refund(
        &self,
        order_id: Uuid,
        amount_refunded_cents: i64,
        status: PaymentStatus,
    ) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set((
                orders::amount_refunded_cents.eq(amount_refunded_cents),
                orders::payment_status.eq(status.as_str()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_order).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn rows_decode_into_domain_orders() {
        let row = OrderRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            draft_id: None,
            tier: "triple".to_owned(),
            payment_status: "paid".to_owned(),
            payment_session_id: "cs_test_123".to_owned(),
            amount_paid_cents: 1200,
            amount_refunded_cents: 400,
            postcard_count: 3,
            created_at: Utc::now(),
        };

        let order = row_to_order(row).expect("decodes");
        assert_eq!(order.tier, PackageTier::Triple);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.amount_refunded_cents, 400);
    }

    #[test]
    fn unknown_tier_strings_surface_as_query_errors() {
        let row = OrderRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            draft_id: None,
            tier: "gold".to_owned(),
            payment_status: "paid".to_owned(),
            payment_session_id: "cs_test_123".to_owned(),
            amount_paid_cents: 1200,
            amount_refunded_cents: 0,
            postcard_count: 0,
            created_at: Utc::now(),
        };

        let error = row_to_order(row).expect_err("invalid tier");
        assert!(matches!(error, OrderRepositoryError::Query { .. }));
    }
}

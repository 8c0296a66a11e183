//! PostgreSQL-backed [`CustomerRepository`] implementation using Diesel.
//!
//! The upsert keys on the normalized email; the sharing token minted at
//! first insert is deliberately excluded from the conflict update so it
//! survives later purchases.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::Rng;
use rand::distributions::Alphanumeric;
use uuid::Uuid;

use crate::domain::MailingAddress;
use crate::domain::NormalizedEmail;
use crate::domain::orders::{Customer, CustomerUpsert};
use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CustomerRow, CustomerUpdate, NewCustomerRow};
use super::pool::{DbPool, PoolError};
use super::schema::customers;

const SHARING_TOKEN_LEN: usize = 22;

/// Diesel-backed implementation of the customer repository port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CustomerRepositoryError {
    map_pool_error(error, CustomerRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CustomerRepositoryError {
    map_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
    )
}

fn mint_sharing_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHARING_TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn encode_address(
    address: &Option<MailingAddress>,
) -> Result<Option<serde_json::Value>, CustomerRepositoryError> {
    address
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| CustomerRepositoryError::query(format!("serialise address: {err}")))
}

fn row_to_customer(row: CustomerRow) -> Result<Customer, CustomerRepositoryError> {
    let email = NormalizedEmail::parse(&row.email)
        .map_err(|err| CustomerRepositoryError::query(format!("decode email: {err}")))?;
    let address: Option<MailingAddress> = row
        .address
        .map(serde_json::from_value)
        .transpose()
        .map_err(|err| CustomerRepositoryError::query(format!("decode address: {err}")))?;

    Ok(Customer {
        id: row.id,
        email,
        display_name: row.display_name,
        address,
        sharing_token: row.sharing_token,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn upsert(&self, customer: &CustomerUpsert) -> Result<Customer, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let address = encode_address(&customer.address)?;
        let sharing_token = mint_sharing_token();

        let new_row = NewCustomerRow {
            id: Uuid::new_v4(),
            email: customer.email.as_str(),
            display_name: &customer.display_name,
            address: address.as_ref(),
            sharing_token: &sharing_token,
        };
        let update = CustomerUpdate {
            display_name: &customer.display_name,
            address: address.as_ref(),
            updated_at: Utc::now(),
        };

        let row = diesel::insert_into(customers::table)
            .values(&new_row)
            .on_conflict(customers::email)
            .do_update()
            .set(&update)
            .returning(CustomerRow::as_returning())
            .get_result::<CustomerRow>(&mut conn)
            .await
            .map_err(diesel_error)?;

        row_to_customer(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharing_tokens_are_alphanumeric_and_fixed_length() {
        let token = mint_sharing_token();
        assert_eq!(token.len(), SHARING_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn rows_decode_into_domain_customers() {
        let row = CustomerRow {
            id: Uuid::new_v4(),
            email: "janedoe@gmail.com".to_owned(),
            display_name: "Jane Doe".to_owned(),
            address: Some(serde_json::json!({
                "line1": "12 Elm St",
                "city": "Springfield",
                "state": "IL",
                "postalCode": "62701",
            })),
            sharing_token: "tok".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let customer = row_to_customer(row).expect("decodes");
        assert_eq!(customer.email.as_str(), "janedoe@gmail.com");
        assert_eq!(
            customer.address.expect("address").city,
            "Springfield"
        );
    }
}

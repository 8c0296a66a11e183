//! PostgreSQL persistence adapters built on Diesel and diesel-async.

pub mod diesel_customer_repository;
pub mod diesel_draft_repository;
pub mod diesel_error_mapping;
pub mod diesel_order_repository;
pub mod diesel_postcard_repository;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_draft_repository::DieselDraftRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_postcard_repository::DieselPostcardRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

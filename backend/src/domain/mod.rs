//! Domain model and services for the advocacy postcard pipeline.
//!
//! Everything here is transport and storage agnostic. Inbound adapters call
//! the driving ports ([`ports::DraftGeneration`], [`ports::CheckoutVerification`]);
//! outbound adapters implement the driven ports behind the services.

mod address;
pub mod checkout;
pub mod drafts;
mod error;
pub mod fulfillment;
mod identity;
pub mod location;
pub mod officials;
pub mod orders;
pub mod ports;

pub use address::MailingAddress;
pub use checkout::CheckoutService;
pub use error::{Error, ErrorCode, ErrorValidationError};
pub use identity::{EmailValidationError, NormalizedEmail};

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CheckoutVerification, DraftGeneration, FixtureCheckoutVerification, FixtureDraftGeneration,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub drafts: Arc<dyn DraftGeneration>,
    pub checkout: Arc<dyn CheckoutVerification>,
}

impl HttpState {
    pub fn new(drafts: Arc<dyn DraftGeneration>, checkout: Arc<dyn CheckoutVerification>) -> Self {
        Self { drafts, checkout }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            drafts: Arc::new(FixtureDraftGeneration),
            checkout: Arc::new(FixtureCheckoutVerification),
        }
    }
}

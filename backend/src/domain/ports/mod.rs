//! Domain ports and supporting types for the hexagonal boundary.

mod checkout_verification;
mod civic_lookup;
mod customer_repository;
mod draft_generation;
mod draft_repository;
mod language_model;
mod mail_vendor;
mod mailer;
mod order_repository;
mod payment_gateway;
mod postcard_repository;
mod web_search;

#[cfg(test)]
pub use checkout_verification::MockCheckoutVerification;
pub use checkout_verification::{
    CheckoutVerification, FixtureCheckoutVerification, VerifyCheckoutRequest,
    VerifyCheckoutResponse,
};
#[cfg(test)]
pub use civic_lookup::MockCivicLookup;
pub use civic_lookup::{CivicLookup, CivicLookupError, FixtureCivicLookup};
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerRepository, CustomerRepositoryError};
#[cfg(test)]
pub use draft_generation::MockDraftGeneration;
pub use draft_generation::{
    ApproveDraftRequest, ApproveDraftResponse, DraftGeneration, DraftWithSources,
    FixtureDraftGeneration, GenerateDraftRequest, GenerateDraftResponse,
};
#[cfg(test)]
pub use draft_repository::MockDraftRepository;
pub use draft_repository::{DraftRepository, DraftRepositoryError, FixtureDraftRepository};
#[cfg(test)]
pub use language_model::MockLanguageModel;
pub use language_model::{
    ComposeRequest, LanguageModel, LanguageModelError, ShortenRequest, ThemeOutcome, ThemeRequest,
};
#[cfg(test)]
pub use mail_vendor::MockMailVendor;
pub use mail_vendor::{MailVendor, MailVendorError, PostcardOrder, PrintTemplate};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{EmailMessage, FixtureMailer, Mailer, MailerError};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{CheckoutSession, PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use postcard_repository::MockPostcardRepository;
pub use postcard_repository::{PostcardRepository, PostcardRepositoryError};
#[cfg(test)]
pub use web_search::MockWebSearch;
pub use web_search::{FixtureWebSearch, SearchHit, WebSearch, WebSearchError};

//! Server construction: adapter wiring, app assembly, and the HTTP listener.

mod config;

pub use config::{ConfigError, ServerConfig, UpstreamConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::CheckoutService;
use crate::domain::drafts::{DraftGenerationService, SourceDiscovery};
use crate::domain::fulfillment::{PostcardDispatcher, RefundReconciler};
use crate::domain::location::LocationResolver;
use crate::domain::ports::{
    CivicLookup, CustomerRepository, DraftRepository, LanguageModel, MailVendor, Mailer,
    OrderRepository, PaymentGateway, PostcardRepository, WebSearch,
};
use crate::inbound::http::checkout::verify_checkout;
use crate::inbound::http::drafts::{approve_draft, generate_draft, get_draft};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::outbound::civic::CivicHttpLookup;
use crate::outbound::email::EmailHttpMailer;
use crate::outbound::llm::LlmHttpModel;
use crate::outbound::mailvendor::MailVendorHttpClient;
use crate::outbound::payments::PaymentsHttpGateway;
use crate::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselDraftRepository, DieselOrderRepository,
    DieselPostcardRepository, PoolConfig,
};
use crate::outbound::search::SearchHttpClient;

/// Failures preventing the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database pool initialisation failed: {0}")]
    Pool(#[from] crate::outbound::persistence::PoolError),
    #[error("http client initialisation failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Wire every adapter and domain service into the HTTP state.
///
/// # Errors
///
/// Returns a [`StartupError`] when the database pool or an HTTP client
/// cannot be constructed.
pub async fn build_state(config: &ServerConfig) -> Result<HttpState, StartupError> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url)).await?;

    let drafts: Arc<dyn DraftRepository> = Arc::new(DieselDraftRepository::new(pool.clone()));
    let customers: Arc<dyn CustomerRepository> =
        Arc::new(DieselCustomerRepository::new(pool.clone()));
    let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));
    let postcards: Arc<dyn PostcardRepository> = Arc::new(DieselPostcardRepository::new(pool));

    let lookup: Arc<dyn CivicLookup> = Arc::new(CivicHttpLookup::new(
        config.civic.endpoint.clone(),
        config.civic.api_key.clone(),
        config.civic.timeout,
    )?);
    let model: Arc<dyn LanguageModel> = Arc::new(LlmHttpModel::new(
        config.llm.endpoint.clone(),
        config.llm.api_key.clone(),
        config.llm_model.clone(),
        config.llm.timeout,
    )?);
    let search: Arc<dyn WebSearch> = Arc::new(SearchHttpClient::new(
        config.search.endpoint.clone(),
        config.search.api_key.clone(),
        config.search.timeout,
    )?);
    let gateway: Arc<dyn PaymentGateway> = Arc::new(PaymentsHttpGateway::new(
        config.payments.endpoint.clone(),
        config.payments.api_key.clone(),
        config.payments.timeout,
    )?);
    let vendor: Arc<dyn MailVendor> = Arc::new(MailVendorHttpClient::new(
        config.mail_vendor.endpoint.clone(),
        config.mail_vendor.api_key.clone(),
        config.mail_vendor.timeout,
    )?);
    let mailer: Arc<dyn Mailer> = Arc::new(EmailHttpMailer::new(
        config.email.endpoint.clone(),
        config.email.api_key.clone(),
        config.email_from.clone(),
        config.email.timeout,
    )?);

    let resolver = LocationResolver::new(lookup);
    let discovery = SourceDiscovery::new(search, Arc::clone(&model));
    let generation = DraftGenerationService::new(
        Arc::clone(&drafts),
        resolver.clone(),
        model,
        discovery,
    );

    let dispatcher = PostcardDispatcher::new(vendor, postcards, Arc::clone(&orders));
    let reconciler = RefundReconciler::new(Arc::clone(&gateway), Arc::clone(&orders));
    let checkout = CheckoutService::new(
        gateway, customers, orders, drafts, resolver, dispatcher, reconciler, mailer,
    );

    Ok(HttpState::new(Arc::new(generation), Arc::new(checkout)))
}

/// Assemble the application: versioned API scope, health probes, and the
/// Swagger UI in debug builds.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(generate_draft)
        .service(approve_draft)
        .service(get_draft)
        .service(verify_checkout);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Bind the listener and spawn the server, marking readiness once bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    bind_addr: std::net::SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

//! OpenAPI documentation configuration.
//!
//! Generates the OpenAPI specification for the REST API: draft generation
//! and approval, checkout verification, and health probes. The document is
//! served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::drafts::GenerationStatus;
use crate::domain::officials::OfficialKind;
use crate::domain::{Error, ErrorCode, MailingAddress};
use crate::inbound::http::checkout::{VerifyCheckoutRequestBody, VerifyCheckoutResponseBody};
use crate::inbound::http::drafts::{
    ApproveDraftRequestBody, ApproveDraftResponseBody, DraftDetailBody, GenerateDraftRequestBody,
    GenerateDraftResponseBody, LocationBody, SourceBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Civicpost backend API",
        description = "Advocacy postcard pipeline: draft generation, checkout \
                       verification, and fulfillment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::drafts::generate_draft,
        crate::inbound::http::drafts::approve_draft,
        crate::inbound::http::drafts::get_draft,
        crate::inbound::http::checkout::verify_checkout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        GenerateDraftRequestBody,
        GenerateDraftResponseBody,
        ApproveDraftRequestBody,
        ApproveDraftResponseBody,
        DraftDetailBody,
        LocationBody,
        SourceBody,
        VerifyCheckoutRequestBody,
        VerifyCheckoutResponseBody,
        GenerationStatus,
        OfficialKind,
        MailingAddress,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "drafts", description = "Draft generation and approval"),
        (name = "checkout", description = "Payment verification and fulfillment"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

//! Draft HTTP handlers.
//!
//! ```text
//! POST /api/v1/drafts               Generate a draft message
//! POST /api/v1/drafts/{id}/approve  Store a human-approved edit
//! GET  /api/v1/drafts/{id}          Fetch a draft with its sources
//! ```

use std::str::FromStr;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::drafts::DraftSource;
use crate::domain::location::Location;
use crate::domain::officials::OfficialKind;
use crate::domain::ports::{
    ApproveDraftRequest, DraftWithSources, GenerateDraftRequest, GenerateDraftResponse,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_non_blank};

/// Request payload for draft generation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDraftRequestBody {
    pub concerns: String,
    #[serde(default)]
    pub personal_impact: Option<String>,
    pub postal_code: String,
    /// Target office: `representative` or `senator`. Defaults to the
    /// representative.
    #[serde(default)]
    pub recipient_kind: Option<String>,
}

/// Resolved location echoed back with the draft.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationBody {
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub region: String,
}

impl From<Location> for LocationBody {
    fn from(value: Location) -> Self {
        Self {
            postal_code: value.postal_code,
            city: value.city,
            state: value.state,
            region: value.region,
        }
    }
}

/// One supporting source attached to a draft.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceBody {
    pub ordinal: i32,
    pub url: String,
    pub outlet: String,
    pub summary: String,
}

impl From<DraftSource> for SourceBody {
    fn from(value: DraftSource) -> Self {
        Self {
            ordinal: value.ordinal,
            url: value.url,
            outlet: value.outlet,
            summary: value.summary,
        }
    }
}

/// Response payload for draft generation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDraftResponseBody {
    #[schema(format = "uuid")]
    pub draft_id: String,
    pub status: String,
    pub message: String,
    pub location: LocationBody,
    pub sources: Vec<SourceBody>,
}

impl From<GenerateDraftResponse> for GenerateDraftResponseBody {
    fn from(value: GenerateDraftResponse) -> Self {
        Self {
            draft_id: value.draft_id.to_string(),
            status: value.status.as_str().to_owned(),
            message: value.message,
            location: LocationBody::from(value.location),
            sources: value.sources.into_iter().map(SourceBody::from).collect(),
        }
    }
}

/// Request payload for approving an edited message.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveDraftRequestBody {
    pub message: String,
}

/// Response payload for draft approval.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveDraftResponseBody {
    #[schema(format = "uuid")]
    pub draft_id: String,
    pub status: String,
}

/// Full draft detail returned by the fetch endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftDetailBody {
    #[schema(format = "uuid")]
    pub draft_id: String,
    pub status: String,
    /// The printable message: the approved edit when one exists, the
    /// generated text otherwise.
    pub message: String,
    pub postal_code: String,
    pub recipient_name: String,
    pub recipient_kind: String,
    pub sources: Vec<SourceBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "uuid")]
    pub order_id: Option<String>,
}

impl From<DraftWithSources> for DraftDetailBody {
    fn from(value: DraftWithSources) -> Self {
        let draft = value.draft;
        Self {
            draft_id: draft.id.to_string(),
            status: draft.status.as_str().to_owned(),
            message: draft.printable_message().to_owned(),
            postal_code: draft.postal_code,
            recipient_name: draft.recipient.name,
            recipient_kind: draft.recipient.kind.as_str().to_owned(),
            sources: value.sources.into_iter().map(SourceBody::from).collect(),
            order_id: draft.order_id.map(|id| id.to_string()),
        }
    }
}

fn parse_recipient_kind(value: Option<&str>) -> Result<OfficialKind, Error> {
    match value {
        None => Ok(OfficialKind::Representative),
        Some(raw) => OfficialKind::from_str(raw).map_err(|_| {
            Error::invalid_request("recipientKind must be representative or senator").with_details(
                json!({
                    "field": "recipientKind",
                    "value": raw,
                }),
            )
        }),
    }
}

/// Generate a draft message from free-text concerns.
#[utoipa::path(
    post,
    path = "/api/v1/drafts",
    request_body = GenerateDraftRequestBody,
    responses(
        (status = 200, description = "Draft generated", body = GenerateDraftResponseBody),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 503, description = "Service unavailable", body = crate::domain::Error)
    ),
    tags = ["drafts"],
    operation_id = "generateDraft"
)]
#[post("/drafts")]
pub async fn generate_draft(
    state: web::Data<HttpState>,
    payload: web::Json<GenerateDraftRequestBody>,
) -> ApiResult<web::Json<GenerateDraftResponseBody>> {
    let payload = payload.into_inner();
    require_non_blank(&payload.concerns, FieldName::new("concerns"))?;
    require_non_blank(&payload.postal_code, FieldName::new("postalCode"))?;
    let recipient_kind = parse_recipient_kind(payload.recipient_kind.as_deref())?;

    let response = state
        .drafts
        .generate(GenerateDraftRequest {
            concerns: payload.concerns,
            personal_impact: payload
                .personal_impact
                .filter(|impact| !impact.trim().is_empty()),
            postal_code: payload.postal_code,
            recipient_kind,
        })
        .await?;

    Ok(web::Json(GenerateDraftResponseBody::from(response)))
}

/// Store a human-approved edit of a generated draft.
#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/approve",
    request_body = ApproveDraftRequestBody,
    params(("id" = String, Path, format = "uuid", description = "Draft identifier")),
    responses(
        (status = 200, description = "Edit stored", body = ApproveDraftResponseBody),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 404, description = "Draft not found", body = crate::domain::Error)
    ),
    tags = ["drafts"],
    operation_id = "approveDraft"
)]
#[post("/drafts/{id}/approve")]
pub async fn approve_draft(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ApproveDraftRequestBody>,
) -> ApiResult<web::Json<ApproveDraftResponseBody>> {
    let draft_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let payload = payload.into_inner();
    require_non_blank(&payload.message, FieldName::new("message"))?;

    let response = state
        .drafts
        .approve(ApproveDraftRequest {
            draft_id,
            message: payload.message,
        })
        .await?;

    Ok(web::Json(ApproveDraftResponseBody {
        draft_id: response.draft_id.to_string(),
        status: response.status.as_str().to_owned(),
    }))
}

/// Fetch a draft with its sources.
#[utoipa::path(
    get,
    path = "/api/v1/drafts/{id}",
    params(("id" = String, Path, format = "uuid", description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft found", body = DraftDetailBody),
        (status = 404, description = "Draft not found", body = crate::domain::Error)
    ),
    tags = ["drafts"],
    operation_id = "getDraft"
)]
#[get("/drafts/{id}")]
pub async fn get_draft(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DraftDetailBody>> {
    let draft_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let response = state.drafts.get(draft_id).await?;
    Ok(web::Json(DraftDetailBody::from(response)))
}

#[cfg(test)]
#[path = "drafts_tests.rs"]
mod tests;

//! Tests for draft HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::drafts::{Draft, GenerationStatus};
use crate::domain::officials::OfficialSnapshot;
use crate::domain::ports::{
    ApproveDraftResponse, DraftGeneration, MockDraftGeneration,
};
use crate::inbound::http::state::HttpState;

fn test_app(
    drafts: Arc<dyn DraftGeneration>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState {
        drafts,
        ..HttpState::default()
    };
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(generate_draft)
            .service(approve_draft)
            .service(get_draft),
    )
}

fn generation_response() -> GenerateDraftResponse {
    GenerateDraftResponse {
        draft_id: Uuid::nil(),
        status: GenerationStatus::Success,
        message: "Dear Budzinski,\nPlease act.\nA constituent from Springfield".to_owned(),
        location: Location {
            postal_code: "62701".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            region: "IL-13".to_owned(),
        },
        sources: vec![DraftSource {
            ordinal: 1,
            url: "https://apnews.com/article".to_owned(),
            outlet: "AP News".to_owned(),
            summary: "Coverage of drug pricing.".to_owned(),
        }],
    }
}

#[actix_web::test]
async fn generate_returns_the_draft_payload() {
    let mut drafts = MockDraftGeneration::new();
    drafts
        .expect_generate()
        .times(1)
        .withf(|request| {
            request.recipient_kind == OfficialKind::Representative
                && request.personal_impact.is_none()
        })
        .returning(|_| Ok(generation_response()));
    let app = actix_test::init_service(test_app(Arc::new(drafts))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drafts")
        .set_json(json!({
            "concerns": "prescription drug costs keep rising",
            "postalCode": "62701",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["location"]["city"], "Springfield");
    assert_eq!(body["sources"][0]["outlet"], "AP News");
}

#[actix_web::test]
async fn generate_rejects_blank_concerns() {
    let app = actix_test::init_service(test_app(Arc::new(MockDraftGeneration::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drafts")
        .set_json(json!({ "concerns": "  ", "postalCode": "62701" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "concerns");
}

#[actix_web::test]
async fn generate_rejects_unknown_recipient_kind() {
    let app = actix_test::init_service(test_app(Arc::new(MockDraftGeneration::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drafts")
        .set_json(json!({
            "concerns": "drug costs",
            "postalCode": "62701",
            "recipientKind": "governor",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "recipientKind");
}

#[actix_web::test]
async fn approve_round_trips_the_status() {
    let draft_id = Uuid::new_v4();
    let mut drafts = MockDraftGeneration::new();
    drafts.expect_approve().times(1).returning(|request| {
        Ok(ApproveDraftResponse {
            draft_id: request.draft_id,
            status: GenerationStatus::Approved,
        })
    });
    let app = actix_test::init_service(test_app(Arc::new(drafts))).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/drafts/{draft_id}/approve"))
        .set_json(json!({ "message": "Dear Budzinski,\nShort.\nJane" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "approved");
    assert_eq!(body["draftId"], draft_id.to_string());
}

#[actix_web::test]
async fn approve_rejects_a_malformed_draft_id() {
    let app = actix_test::init_service(test_app(Arc::new(MockDraftGeneration::new()))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drafts/not-a-uuid/approve")
        .set_json(json!({ "message": "hello" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn get_returns_the_approved_message_when_present() {
    let draft_id = Uuid::new_v4();
    let mut drafts = MockDraftGeneration::new();
    drafts.expect_get().times(1).returning(move |id| {
        let now = Utc::now();
        Ok(DraftWithSources {
            draft: Draft {
                id,
                concerns: "drug costs".to_owned(),
                personal_impact: None,
                postal_code: "62701".to_owned(),
                recipient: OfficialSnapshot {
                    name: "Nikki Budzinski".to_owned(),
                    kind: OfficialKind::Representative,
                    office: None,
                },
                status: GenerationStatus::Approved,
                message: "generated text".to_owned(),
                approved_message: Some("edited text".to_owned()),
                source_count: 0,
                order_id: None,
                created_at: now,
                updated_at: now,
            },
            sources: Vec::new(),
        })
    });
    let app = actix_test::init_service(test_app(Arc::new(drafts))).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/drafts/{draft_id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "edited text");
    assert_eq!(body["recipientKind"], "representative");
}

#[actix_web::test]
async fn get_missing_draft_is_not_found() {
    let app = actix_test::init_service(test_app(Arc::new(
        crate::domain::ports::FixtureDraftGeneration,
    )))
    .await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/drafts/{}", Uuid::new_v4()))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! Tests for the draft generation service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::location::Location;
use crate::domain::ports::{
    LanguageModelError, MockCivicLookup, MockDraftRepository, MockLanguageModel, MockWebSearch,
    SearchHit, ThemeOutcome,
};

fn springfield() -> Jurisdiction {
    Jurisdiction {
        location: Location {
            postal_code: "62701".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            region: "IL-13".to_owned(),
        },
        officials: vec![
            OfficialSnapshot {
                name: "Nikki Budzinski".to_owned(),
                kind: OfficialKind::Representative,
                office: None,
            },
            OfficialSnapshot {
                name: "Tammy Duckworth".to_owned(),
                kind: OfficialKind::Senator,
                office: None,
            },
        ],
    }
}

fn single_theme_outcome() -> ThemeOutcome {
    ThemeOutcome {
        themes: vec!["prescription drug costs".to_owned()],
        urgency_keywords: vec!["rising costs".to_owned(), "seniors".to_owned()],
        local_angle: "pharmacies closing".to_owned(),
        search_terms: vec!["drug costs".to_owned(), "insulin cap".to_owned()],
        confidence: 0.9,
    }
}

fn lookup_returning_springfield() -> MockCivicLookup {
    let mut lookup = MockCivicLookup::new();
    lookup
        .expect_lookup_postal_code()
        .returning(|_| Ok(springfield()));
    lookup
}

fn request() -> GenerateDraftRequest {
    GenerateDraftRequest {
        concerns: "prescription drug costs keep rising".to_owned(),
        personal_impact: Some("my mother skips doses".to_owned()),
        postal_code: "62701".to_owned(),
        recipient_kind: OfficialKind::Representative,
    }
}

fn service(
    repo: MockDraftRepository,
    model: MockLanguageModel,
    search: MockWebSearch,
) -> DraftGenerationService {
    let model = Arc::new(model);
    let search: Arc<dyn crate::domain::ports::WebSearch> = Arc::new(search);
    DraftGenerationService::new(
        Arc::new(repo),
        LocationResolver::new(Arc::new(lookup_returning_springfield())),
        Arc::clone(&model) as Arc<dyn LanguageModel>,
        SourceDiscovery::new(search, Arc::clone(&model) as Arc<dyn LanguageModel>),
    )
}

#[tokio::test]
async fn generate_persists_attempt_and_returns_bounded_message() {
    let mut repo = MockDraftRepository::new();
    repo.expect_create().times(1).return_once(|_| Ok(()));
    repo.expect_insert_sources().times(1).return_once(|_, _| Ok(()));
    repo.expect_record_outcome()
        .times(1)
        .withf(|_, status, message, source_count| {
            *status == GenerationStatus::Success && !message.is_empty() && *source_count == 1
        })
        .return_once(|_, _, _, _| Ok(()));

    let mut model = MockLanguageModel::new();
    model
        .expect_analyze_theme()
        .times(1)
        .return_once(|_| Ok(single_theme_outcome()));
    model
        .expect_summarize_source()
        .returning(|_, _, _| Ok("coverage of drug pricing".to_owned()));
    model.expect_compose_draft().times(1).return_once(|_| {
        Ok("Dear Budzinski,\nPlease cap insulin prices now.\nA constituent from Springfield"
            .to_owned())
    });

    let mut search = MockWebSearch::new();
    search.expect_search().returning(|query| {
        if query.starts_with("drug costs") {
            Ok(vec![SearchHit {
                url: "https://apnews.com/article".to_owned(),
                outlet: Some("AP News".to_owned()),
                snippet: Some("drug pricing report".to_owned()),
            }])
        } else {
            Ok(Vec::new())
        }
    });

    let response = service(repo, model, search)
        .generate(request())
        .await
        .expect("generation succeeds");

    assert_eq!(response.status, GenerationStatus::Success);
    assert!(crate::domain::drafts::composer::message_len(&response.message) <= MESSAGE_HARD_CEILING);
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.location.city, "Springfield");
}

#[tokio::test]
async fn generate_rejects_empty_concerns_naming_the_field() {
    let mut repo = MockDraftRepository::new();
    repo.expect_create().times(0);

    let error = service(repo, MockLanguageModel::new(), MockWebSearch::new())
        .generate(GenerateDraftRequest {
            concerns: "   ".to_owned(),
            ..request()
        })
        .await
        .expect_err("missing concerns");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details name the field");
    assert_eq!(details["field"], "concerns");
}

#[tokio::test]
async fn theme_failure_persists_error_status_and_returns_fallback() {
    let mut repo = MockDraftRepository::new();
    repo.expect_create().times(1).return_once(|_| Ok(()));
    repo.expect_record_outcome()
        .times(1)
        .withf(|_, status, message, _| *status == GenerationStatus::Error && !message.is_empty())
        .return_once(|_, _, _, _| Ok(()));

    let mut model = MockLanguageModel::new();
    model
        .expect_analyze_theme()
        .times(1)
        .return_once(|_| Err(LanguageModelError::transport("connection reset")));

    let response = service(repo, model, MockWebSearch::new())
        .generate(request())
        .await
        .expect("degraded generation still responds");

    assert_eq!(response.status, GenerationStatus::Error);
    assert!(!response.message.is_empty());
    assert!(response.sources.is_empty());
}

#[tokio::test]
async fn ambiguous_themes_are_a_hard_error_for_the_attempt() {
    let mut repo = MockDraftRepository::new();
    repo.expect_create().times(1).return_once(|_| Ok(()));
    repo.expect_record_outcome()
        .times(1)
        .withf(|_, status, _, _| *status == GenerationStatus::Error)
        .return_once(|_, _, _, _| Ok(()));

    let mut model = MockLanguageModel::new();
    model.expect_analyze_theme().times(1).return_once(|_| {
        let mut outcome = single_theme_outcome();
        outcome.themes.push("housing".to_owned());
        Ok(outcome)
    });
    model.expect_compose_draft().times(0);

    let response = service(repo, model, MockWebSearch::new())
        .generate(request())
        .await
        .expect("degraded generation still responds");
    assert_eq!(response.status, GenerationStatus::Error);
}

#[tokio::test]
async fn persistence_failure_does_not_block_a_usable_result() {
    let mut repo = MockDraftRepository::new();
    repo.expect_create()
        .times(1)
        .return_once(|_| Err(DraftRepositoryError::connection("pool exhausted")));
    repo.expect_record_outcome()
        .times(1)
        .return_once(|_, _, _, _| Err(DraftRepositoryError::query("write failed")));

    let mut model = MockLanguageModel::new();
    model
        .expect_analyze_theme()
        .times(1)
        .return_once(|_| Ok(single_theme_outcome()));
    model.expect_compose_draft().times(1).return_once(|_| {
        Ok("Dear Budzinski,\nPlease cap insulin prices now.\nA constituent from Springfield"
            .to_owned())
    });

    let mut search = MockWebSearch::new();
    search.expect_search().returning(|_| Ok(Vec::new()));

    let response = service(repo, model, search)
        .generate(request())
        .await
        .expect("response survives persistence failures");
    assert_eq!(response.status, GenerationStatus::Success);
}

#[tokio::test]
async fn approve_enforces_the_character_ceiling() {
    let repo = MockDraftRepository::new();
    let error = service(repo, MockLanguageModel::new(), MockWebSearch::new())
        .approve(ApproveDraftRequest {
            draft_id: Uuid::new_v4(),
            message: "x".repeat(MESSAGE_HARD_CEILING + 1),
        })
        .await
        .expect_err("over the ceiling");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn approve_missing_draft_is_not_found() {
    let mut repo = MockDraftRepository::new();
    repo.expect_approve().times(1).return_once(|_, _| Ok(None));

    let error = service(repo, MockLanguageModel::new(), MockWebSearch::new())
        .approve(ApproveDraftRequest {
            draft_id: Uuid::new_v4(),
            message: "Dear Budzinski,\nShort.\nJane".to_owned(),
        })
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn approve_returns_the_updated_status() {
    let draft_id = Uuid::new_v4();
    let mut repo = MockDraftRepository::new();
    repo.expect_approve().times(1).return_once(move |id, message| {
        let now = Utc::now();
        Ok(Some(Draft {
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
            message: "generated".to_owned(),
            approved_message: Some(message.to_owned()),
            source_count: 0,
            order_id: None,
            created_at: now,
            updated_at: now,
        }))
    });

    let response = service(repo, MockLanguageModel::new(), MockWebSearch::new())
        .approve(ApproveDraftRequest {
            draft_id,
            message: "Dear Budzinski,\nShort.\nJane".to_owned(),
        })
        .await
        .expect("approve succeeds");

    assert_eq!(response.draft_id, draft_id);
    assert_eq!(response.status, GenerationStatus::Approved);
}

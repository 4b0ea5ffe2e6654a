mod common;

use std::sync::Arc;

use common::{FakeQuizApi, sample_quiz};
use quiz_core::model::{BearerToken, QuizDraft, QuizId};
use services::{QuizApi, QuizScope, QuizService, QuizServiceError, QuizSourceFile, QuizUpdate};

fn service() -> (QuizService, Arc<FakeQuizApi>) {
    let api = Arc::new(FakeQuizApi::new());
    (QuizService::new(Arc::clone(&api) as Arc<dyn QuizApi>), api)
}

fn token() -> BearerToken {
    BearerToken::new("token-u1")
}

fn draft() -> QuizDraft {
    QuizDraft {
        title: "T".into(),
        description: "D".into(),
        total_marks: 10,
        time_limit_minutes: Some(5),
    }
}

fn source() -> QuizSourceFile {
    QuizSourceFile {
        file_name: "questions.pdf".into(),
        bytes: b"%PDF-1.4 stub".to_vec(),
    }
}

#[tokio::test]
async fn created_quiz_shows_up_in_my_quizzes() {
    let (service, _api) = service();

    let refreshed = service
        .create(&token(), draft(), Some(source()))
        .await
        .unwrap();

    // The returned list is the re-fetched server truth.
    assert!(refreshed.iter().any(|quiz| quiz.title == "T"));

    let listed = service.list(QuizScope::Mine, Some(&token())).await.unwrap();
    assert!(listed.iter().any(|quiz| quiz.title == "T"));
}

#[tokio::test]
async fn create_requires_a_source_file() {
    let (service, _api) = service();
    let err = service.create(&token(), draft(), None).await.unwrap_err();
    assert!(matches!(err, QuizServiceError::MissingSourceFile));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_api() {
    let (service, _api) = service();
    let mut bad = draft();
    bad.title = "  ".into();

    let err = service
        .create(&token(), bad, Some(source()))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizServiceError::Draft(_)));

    let listed = service.list(QuizScope::Mine, Some(&token())).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn authenticated_scopes_require_a_token() {
    let (service, _api) = service();
    let err = service.list(QuizScope::Mine, None).await.unwrap_err();
    assert!(matches!(err, QuizServiceError::NotSignedIn));

    // The public scope works without one.
    assert!(service.list(QuizScope::Public, None).await.is_ok());
}

#[tokio::test]
async fn update_toggles_visibility_and_returns_the_refreshed_list() {
    let api = Arc::new(FakeQuizApi::new().with_quiz(sample_quiz("quiz-1", 2, None)));
    let service = QuizService::new(Arc::clone(&api) as Arc<dyn QuizApi>);
    let id = QuizId::new("quiz-1");

    let fetched = service.get(&id).await.unwrap();
    let mut update = QuizUpdate::from_quiz(&fetched);
    update.is_public = false;
    update.title = "Renamed".into();

    let refreshed = service.update(&token(), &id, &update).await.unwrap();
    let renamed = refreshed.iter().find(|quiz| quiz.id == id).unwrap();
    assert_eq!(renamed.title, "Renamed");
    assert!(!renamed.is_public);
}

#[tokio::test]
async fn delete_refreshes_the_list() {
    let api = Arc::new(FakeQuizApi::new().with_quiz(sample_quiz("quiz-1", 2, None)));
    let service = QuizService::new(Arc::clone(&api) as Arc<dyn QuizApi>);

    let refreshed = service.delete(&token(), &QuizId::new("quiz-1")).await.unwrap();
    assert!(refreshed.is_empty());
}

#[tokio::test]
async fn deleting_a_question_returns_the_refetched_quiz() {
    let api = Arc::new(FakeQuizApi::new().with_quiz(sample_quiz("quiz-1", 3, None)));
    let service = QuizService::new(Arc::clone(&api) as Arc<dyn QuizApi>);
    let id = QuizId::new("quiz-1");

    let quiz = service.get(&id).await.unwrap();
    let doomed = quiz.questions[1].id.clone();

    let updated = service.delete_question(&token(), &id, &doomed).await.unwrap();
    assert_eq!(updated.questions.len(), 2);
    assert!(updated.questions.iter().all(|question| question.id != doomed));
}

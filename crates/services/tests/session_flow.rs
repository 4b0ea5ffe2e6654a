mod common;

use std::sync::Arc;

use common::{FakeAuthApi, WhoAmIMode, sample_user};
use quiz_core::model::{BearerToken, Session};
use services::{AuthApi, AuthGate, GateDecision, LoginOutcome, RouteClass, SessionService};
use storage::repository::{
    CredentialRepository, InMemoryRepository, StoredCredentials,
};

fn service_with(auth: FakeAuthApi) -> (SessionService, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let service = SessionService::new(
        Arc::new(auth) as Arc<dyn AuthApi>,
        Arc::clone(&repo) as Arc<dyn CredentialRepository>,
    );
    (service, repo)
}

fn casey_auth() -> FakeAuthApi {
    FakeAuthApi::new().with_account("casey@example.com", "hunter2", sample_user())
}

#[tokio::test]
async fn login_persists_token_and_establishes_user() {
    let (service, repo) = service_with(casey_auth());
    let before = service.epoch();

    let outcome = service.login("casey@example.com", "hunter2").await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Authenticated(user) if user.username == "casey"));

    let session = service.snapshot();
    assert!(session.is_authenticated());
    assert!(session.token().is_some());
    assert!(service.epoch() > before);

    let stored = repo.load_credentials().await.unwrap().expect("token persisted");
    assert_eq!(Some(&stored.token), session.token());
}

#[tokio::test]
async fn rejected_credentials_leave_the_session_empty() {
    let (service, repo) = service_with(casey_auth());

    let outcome = service.login("casey@example.com", "wrong").await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Rejected { .. }));

    assert_eq!(service.snapshot(), Session::empty());
    assert!(repo.load_credentials().await.unwrap().is_none());
}

#[tokio::test]
async fn signup_behaves_like_login() {
    let (service, _repo) = service_with(FakeAuthApi::new());

    let outcome = service
        .signup("newbie", "newbie@example.com", "pw")
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::Authenticated(user) if user.username == "newbie"));
    assert!(service.is_authenticated());
}

#[tokio::test]
async fn transient_whoami_failure_keeps_the_stored_token() {
    let auth = casey_auth();
    let handle = Arc::new(auth);
    let repo = Arc::new(InMemoryRepository::new());
    let service = SessionService::new(
        Arc::clone(&handle) as Arc<dyn AuthApi>,
        Arc::clone(&repo) as Arc<dyn CredentialRepository>,
    );

    service.login("casey@example.com", "hunter2").await.unwrap();
    handle.set_whoami_mode(WhoAmIMode::Unavailable);

    let err = service.fetch_current_user().await.unwrap_err();
    assert!(matches!(err, services::SessionError::Api(_)));

    // The user is cleared but the token survives; signing out over a
    // blip would be hostile.
    let session = service.snapshot();
    assert!(!session.is_authenticated());
    assert!(session.token().is_some());
    assert!(repo.load_credentials().await.unwrap().is_some());
}

#[tokio::test]
async fn unauthorized_whoami_clears_everything_and_gate_redirects() {
    let handle = Arc::new(casey_auth());
    let repo = Arc::new(InMemoryRepository::new());
    let service = SessionService::new(
        Arc::clone(&handle) as Arc<dyn AuthApi>,
        Arc::clone(&repo) as Arc<dyn CredentialRepository>,
    );

    service.login("casey@example.com", "hunter2").await.unwrap();
    handle.set_whoami_mode(WhoAmIMode::Unauthorized);

    let user = service.fetch_current_user().await.unwrap();
    assert!(user.is_none());

    let session = service.snapshot();
    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert!(repo.load_credentials().await.unwrap().is_none());

    // Subsequent protected-route navigation goes to login.
    let gate = AuthGate::default();
    assert_eq!(
        gate.decide(session.is_authenticated(), RouteClass::Protected),
        GateDecision::RedirectToLogin
    );
}

#[tokio::test]
async fn restore_resumes_a_persisted_session() {
    let handle = Arc::new(FakeAuthApi::new());
    handle.seed_token("token-from-last-run", sample_user());

    let repo = Arc::new(InMemoryRepository::new());
    repo.save_credentials(&StoredCredentials::new(
        BearerToken::new("token-from-last-run"),
        Some(sample_user()),
    ))
    .await
    .unwrap();

    let service = SessionService::new(
        Arc::clone(&handle) as Arc<dyn AuthApi>,
        Arc::clone(&repo) as Arc<dyn CredentialRepository>,
    );

    let user = service.restore().await.unwrap();
    assert_eq!(user, Some(sample_user()));
    assert!(service.is_authenticated());
}

#[tokio::test]
async fn restore_without_credentials_is_a_quiet_noop() {
    let (service, _repo) = service_with(FakeAuthApi::new());
    let user = service.restore().await.unwrap();
    assert!(user.is_none());
    assert!(!service.is_authenticated());
}

#[tokio::test]
async fn logout_clears_memory_and_storage() {
    let (service, repo) = service_with(casey_auth());
    service.login("casey@example.com", "hunter2").await.unwrap();

    service.logout().await.unwrap();

    assert_eq!(service.snapshot(), Session::empty());
    assert!(repo.load_credentials().await.unwrap().is_none());
}

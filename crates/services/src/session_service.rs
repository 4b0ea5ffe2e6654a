use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use quiz_core::model::{BearerToken, Session, UserSummary};
use storage::repository::{CredentialRepository, StoredCredentials};

use crate::api::AuthApi;
use crate::error::{ApiError, SessionError};

/// What a login or signup attempt produced.
///
/// Rejected credentials are an expected outcome, not an error: the caller
/// shows the message and leaves the form interactive. Only transport-level
/// problems surface as `SessionError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(UserSummary),
    Rejected { message: String },
}

/// The session store: owns the client's belief about who is signed in.
///
/// State is explicitly injected rather than ambient. Views read immutable
/// `snapshot()`s; every mutation bumps `epoch()`, which is the
/// change-notification mechanism. After awaiting any operation here,
/// re-read the snapshot if the epoch moved.
pub struct SessionService {
    api: Arc<dyn AuthApi>,
    credentials: Arc<dyn CredentialRepository>,
    state: RwLock<Session>,
    epoch: AtomicU64,
}

impl SessionService {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            api,
            credentials,
            state: RwLock::new(Session::empty()),
            epoch: AtomicU64::new(0),
        }
    }

    /// A point-in-time copy of the session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Monotonic change counter; bumped on every session mutation.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_authenticated()
    }

    fn mutate(&self, apply: impl FnOnce(&mut Session)) {
        {
            let mut guard = self
                .state
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            apply(&mut guard);
        }
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Startup path: restore persisted credentials and reconcile with the
    /// server.
    ///
    /// The cached user is applied optimistically so the navbar can greet the
    /// user at once; the "who am I" fetch then confirms or clears it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the credential store is unusable;
    /// reconciliation failures are the same as for `fetch_current_user`.
    pub async fn restore(&self) -> Result<Option<UserSummary>, SessionError> {
        let Some(stored) = self.credentials.load_credentials().await? else {
            return Ok(None);
        };

        self.mutate(|session| {
            session.set_token(stored.token.clone());
            if let Some(user) = stored.user.clone() {
                session.set_user(user);
            }
        });

        self.fetch_current_user().await
    }

    /// Exchange credentials for a token, persist it, and establish the user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only for transport-level or storage failures;
    /// rejected credentials come back as `LoginOutcome::Rejected`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, SessionError> {
        let grant = match self.api.login(email, password).await {
            Ok(grant) => grant,
            Err(err) => return rejection_or_error(err),
        };
        self.establish(grant.token, grant.user).await
    }

    /// Register a new account; otherwise identical to `login`.
    ///
    /// # Errors
    ///
    /// Same contract as `login`.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        let grant = match self.api.signup(username, email, password).await {
            Ok(grant) => grant,
            Err(err) => return rejection_or_error(err),
        };
        self.establish(grant.token, grant.user).await
    }

    async fn establish(
        &self,
        token: BearerToken,
        inline_user: Option<UserSummary>,
    ) -> Result<LoginOutcome, SessionError> {
        self.credentials
            .save_credentials(&StoredCredentials::new(token.clone(), inline_user.clone()))
            .await?;
        self.mutate(|session| {
            session.set_token(token);
            if let Some(user) = inline_user {
                session.set_user(user);
            }
        });

        // The grant may omit the user object; a "who am I" round trip makes
        // the session authoritative either way.
        match self.fetch_current_user().await? {
            Some(user) => {
                debug!(user = %user.id, "session established");
                Ok(LoginOutcome::Authenticated(user))
            }
            None => Ok(LoginOutcome::Rejected {
                message: "Signed in, but the session could not be confirmed.".to_owned(),
            }),
        }
    }

    /// Ask the server who the stored token belongs to.
    ///
    /// On success the user is set and the cached copy refreshed. A 401
    /// clears both the stored token and the in-memory user. Any other
    /// failure clears the in-memory user but leaves the stored token
    /// untouched, so a transient outage does not sign the user out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` for transient failures (after applying
    /// the clearing described above) and `SessionError::Storage` if the
    /// credential store is unusable.
    pub async fn fetch_current_user(&self) -> Result<Option<UserSummary>, SessionError> {
        let token = self.snapshot().token().cloned();
        let Some(token) = token else {
            self.mutate(Session::clear_user);
            return Ok(None);
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                self.mutate(|session| session.set_user(user.clone()));
                self.credentials
                    .save_credentials(&StoredCredentials::new(token, Some(user.clone())))
                    .await?;
                Ok(Some(user))
            }
            Err(ApiError::Unauthorized) => {
                debug!("stored token rejected, clearing session");
                self.mutate(Session::clear);
                self.credentials.clear_credentials().await?;
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "could not confirm session, keeping token");
                self.mutate(Session::clear_user);
                Err(err.into())
            }
        }
    }

    /// Sign out locally. Always clears the in-memory session, even when the
    /// credential store fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the persisted credentials could
    /// not be removed; the in-memory session is cleared regardless.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.mutate(Session::clear);
        self.credentials.clear_credentials().await?;
        debug!("signed out");
        Ok(())
    }
}

fn rejection_or_error(err: ApiError) -> Result<LoginOutcome, SessionError> {
    match err {
        ApiError::Unauthorized => Ok(LoginOutcome::Rejected {
            message: "Invalid credentials".to_owned(),
        }),
        ApiError::Validation { message, .. } => Ok(LoginOutcome::Rejected { message }),
        other => Err(other.into()),
    }
}

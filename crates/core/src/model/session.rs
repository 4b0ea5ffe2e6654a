use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::UserSummary;

/// An opaque credential string sent with each authenticated request.
///
/// The token value never appears in `Debug` output so it cannot leak into
/// logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(…)")
    }
}

/// The client's belief about the currently authenticated user and their
/// credential token.
///
/// Created empty at process start. Populated by a successful login/signup or
/// by a successful "who am I" fetch using a stored token. Cleared on logout
/// or on an authentication failure. Owned exclusively by the session store;
/// everyone else reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    user: Option<UserSummary>,
    token: Option<BearerToken>,
}

impl Session {
    /// An empty, unauthenticated session.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// True once a user identity has been established.
    ///
    /// A stored token alone is not enough: the auth gate keys off the user,
    /// which only a successful "who am I" fetch provides.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_token(&mut self, token: BearerToken) {
        self.token = Some(token);
    }

    pub fn set_user(&mut self, user: UserSummary) {
        self.user = Some(user);
    }

    /// Drop the user identity but keep the token (transient-failure path).
    pub fn clear_user(&mut self) {
        self.user = None;
    }

    /// Drop everything (logout, or a 401 from the server).
    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    fn user() -> UserSummary {
        UserSummary {
            id: UserId::new("u1"),
            username: "casey".into(),
            email: "casey@example.com".into(),
        }
    }

    #[test]
    fn empty_session_is_unauthenticated() {
        let session = Session::empty();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn token_alone_is_not_authenticated() {
        let mut session = Session::empty();
        session.set_token(BearerToken::new("t"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clear_user_keeps_token() {
        let mut session = Session::empty();
        session.set_token(BearerToken::new("t"));
        session.set_user(user());
        session.clear_user();
        assert!(!session.is_authenticated());
        assert_eq!(session.token().map(BearerToken::as_str), Some("t"));
    }

    #[test]
    fn clear_drops_everything() {
        let mut session = Session::empty();
        session.set_token(BearerToken::new("t"));
        session.set_user(user());
        session.clear();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let token = BearerToken::new("super-secret");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
    }
}

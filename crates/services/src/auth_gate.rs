//! The redirect logic enforcing that protected views require a session and
//! auth views require its absence.
//!
//! This is a pure predicate evaluated synchronously on every navigation. It
//! is a presentation-layer convenience, not a security boundary; the
//! authoritative check is server-side token validation on each API call.

/// Coarse classification of a navigable route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Reachable by anyone (home, about).
    Public,
    /// Login and signup; pointless once a session exists.
    Auth,
    /// Requires an established user (dashboard, quiz management).
    Protected,
    /// The attempt view; its accessibility is a configuration choice.
    Attempt,
}

/// Whether the attempt view is reachable without a session.
///
/// `Public` mirrors the original platform behavior; `RequiresAuth` folds
/// attempts into the protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptAccess {
    #[default]
    Public,
    RequiresAuth,
}

/// The gate's verdict for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate {
    attempt_access: AttemptAccess,
}

impl AuthGate {
    #[must_use]
    pub fn new(attempt_access: AttemptAccess) -> Self {
        Self { attempt_access }
    }

    #[must_use]
    pub fn attempt_access(&self) -> AttemptAccess {
        self.attempt_access
    }

    /// Decide whether a navigation may proceed.
    #[must_use]
    pub fn decide(&self, authenticated: bool, route: RouteClass) -> GateDecision {
        let route = match (route, self.attempt_access) {
            (RouteClass::Attempt, AttemptAccess::RequiresAuth) => RouteClass::Protected,
            (RouteClass::Attempt, AttemptAccess::Public) => RouteClass::Public,
            (other, _) => other,
        };

        match (authenticated, route) {
            (true, RouteClass::Auth) => GateDecision::RedirectToDashboard,
            (false, RouteClass::Protected) => GateDecision::RedirectToLogin,
            _ => GateDecision::Allow,
        }
    }
}

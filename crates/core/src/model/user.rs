use serde::{Deserialize, Serialize};

use crate::model::UserId;

/// The server's description of the currently authenticated user.
///
/// This is a wire-facing value: it is deserialized from the auth endpoints
/// and cached locally so the navbar can greet the user before the first
/// "who am I" round trip completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl UserSummary {
    /// Name shown in the navbar and on the dashboard greeting.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_username() {
        let user = UserSummary {
            id: UserId::new("u1"),
            username: "casey".into(),
            email: "casey@example.com".into(),
        };
        assert_eq!(user.display_name(), "casey");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = UserSummary {
            id: UserId::new("u1"),
            username: String::new(),
            email: "casey@example.com".into(),
        };
        assert_eq!(user.display_name(), "casey@example.com");
    }
}

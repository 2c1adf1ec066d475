use serde::{Deserialize, Serialize};

use crate::UserId;

/// Caller information derived from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    id: UserId,
    name: String,
    email: Option<String>,
}

impl UserIdentity {
    /// Creates a caller identity from stored user data.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email,
        }
    }

    /// Returns the numeric user id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the email, if one is on record.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

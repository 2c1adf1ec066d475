use serde::{Deserialize, Serialize};

/// Message surfaced for generic authorization failures.
pub const UNAUTHORIZED_MESSAGE: &str = "Not Authorised!";

/// Why a rule denied access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum DenyReason {
    /// Caller lacks identity or permission. No detail is surfaced.
    Unauthorized,
    /// User-facing explanation surfaced verbatim.
    Message(String),
}

impl DenyReason {
    /// Returns the text surfaced to the client.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized => UNAUTHORIZED_MESSAGE,
            Self::Message(message) => message.as_str(),
        }
    }
}

/// Result of evaluating a rule or rule expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// Field may be resolved.
    Allow,
    /// Field must not be resolved.
    Deny(DenyReason),
}

impl Outcome {
    /// Generic deny.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Deny(DenyReason::Unauthorized)
    }

    /// Deny with a user-facing message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Deny(DenyReason::Message(message.into()))
    }

    /// Maps a boolean check onto `Allow` or a generic deny.
    #[must_use]
    pub fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::unauthorized() }
    }

    /// Returns whether the outcome allows access.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the deny reason, if any.
    #[must_use]
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account summary returned by auth calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// The signed-in user as reported by `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Outcome body of the login/signup/password forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub user: Option<User>,
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl AuthResponse {
    /// A response that issued a credential counts as successful.
    pub fn is_success(&self) -> bool {
        self.success || self.access_token.is_some()
    }

    /// Whether the backend refused login because the email is unverified.
    pub fn needs_verification(&self) -> bool {
        !self.is_success()
            && self
                .message
                .as_deref()
                .is_some_and(|m| m.to_ascii_lowercase().contains("verify"))
    }
}

/// Result of following an email verification link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    Expired,
    Invalid,
    Failed(String),
}

impl VerificationOutcome {
    /// Classify a backend failure message.
    pub fn from_failure(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("expired") {
            Self::Expired
        } else if lower.contains("invalid") {
            Self::Invalid
        } else {
            Self::Failed(message.to_string())
        }
    }
}

//! Wire types for the identity provider's REST auth API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of a one-shot session/status fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub email: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl SessionStatus {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

#[derive(Debug, Serialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ResendRequest {
    /// Which message to resend; always "signup" for confirmation mail.
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

/// Signup response. The provider returns the bare user object while the
/// address is unconfirmed, and a full session (token + user) when it
/// auto-confirms; both shapes are accepted.
#[derive(Debug, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl SignUpResponse {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id).or(self.id)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: ApiUser,
}

/// Error payload; the provider is not consistent about the field name.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self, fallback: &str) -> String {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .unwrap_or_else(|| fallback.to_string())
    }
}

//! Accounts, profiles and the auth form payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed-in account as exposed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// The stored profile row backing a registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

impl Profile {
    /// Display name for post bylines; falls back when the profile is gone.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// One-letter avatar derived from the first name.
    pub fn avatar(&self) -> String {
        self.first_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Payload of the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    #[serde(default)]
    pub school: Option<String>,
}

/// Payload of the sign-in form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: &str, last: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            user_type: "student".to_string(),
            school: None,
        }
    }

    #[test]
    fn full_name_joins_parts() {
        assert_eq!(profile("Ada", "Lovelace").full_name(), "Ada Lovelace");
    }

    #[test]
    fn avatar_uppercases_initial() {
        assert_eq!(profile("ada", "Lovelace").avatar(), "A");
        assert_eq!(profile("", "Lovelace").avatar(), "?");
    }
}

//! Authentication payloads for `/auth/login` and `/auth/register`

use serde::{Deserialize, Serialize};

use crate::enums::Role;
use crate::serde_helpers::null_as_default;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response body of both auth endpoints.
///
/// Success and failure share the shape; a missing `token` is a failure even
/// when the HTTP status was 2xx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuthResponse {
    /// The token, if present and non-empty
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Identity snapshot carried alongside the token
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            token_type: self.token_type.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Denormalised identity persisted next to the token.
///
/// Kept separately because the token's claims only carry a single role while
/// the backend may grant several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl UserIdentity {
    /// Highest-privilege role for display
    pub fn display_role(&self) -> Option<Role> {
        Role::highest(self.roles.iter().map(String::as_str))
    }
}

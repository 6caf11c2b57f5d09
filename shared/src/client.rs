//! Client-related types shared between server and client
//!
//! Request/response DTOs used in the auth API.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login (and refresh) response
///
/// Token expiries are validity durations in milliseconds at issuance,
/// not absolute timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub full_name: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expiry: u64,
    pub refresh_token_expiry: u64,
    pub role: String,
}

/// Minimal user profile persisted alongside the tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: String,
    pub username: String,
    pub role: String,
}

impl From<&LoginResponse> for UserProfile {
    fn from(login: &LoginResponse) -> Self {
        Self {
            full_name: login.full_name.clone(),
            username: login.username.clone(),
            role: login.role.clone(),
        }
    }
}

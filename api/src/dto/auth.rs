use serde::{Deserialize, Serialize};

/// Body of `POST /auth/refresh`; the token may instead come from the header or cookie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Present only when the refresh token was rotated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl RefreshResponse {
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: String::from("Bearer"),
            expires_in,
        }
    }
}

/// Optional body of `POST /auth/logout`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

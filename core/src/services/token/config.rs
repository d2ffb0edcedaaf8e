//! Configuration for the token service

use ag_shared::config::JwtConfig;

/// Configuration for the token service
///
/// Built once at startup from [`JwtConfig`] and handed to [`super::TokenService::new`].
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Base64-encoded signing secret
    pub secret: Option<String>,
    /// Access token lifetime in milliseconds
    pub access_token_ttl_ms: i64,
    /// Refresh token lifetime in milliseconds
    pub refresh_token_ttl_ms: i64,
    /// Required `iss` claim
    pub issuer: String,
    /// Required `aud` claim
    pub audience: String,
    /// Whether the HTTP refresh path should rotate refresh tokens
    pub rotate_refresh_tokens: bool,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            secret: jwt.secret.clone(),
            access_token_ttl_ms: jwt.access_token_expiry_ms,
            refresh_token_ttl_ms: jwt.refresh_token_expiry_ms,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            rotate_refresh_tokens: jwt.rotate_refresh_tokens,
        }
    }
}

impl TokenServiceConfig {
    /// Configuration with the given secret and default lifetimes
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_ms / 1000
    }

    pub fn refresh_token_ttl_seconds(&self) -> i64 {
        self.refresh_token_ttl_ms / 1000
    }
}

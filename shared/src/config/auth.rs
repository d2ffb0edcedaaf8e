//! Token and cookie configuration

use serde::{Deserialize, Serialize};

/// Minimum accepted length of the configured signing secret (before base64 decoding)
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT signing and lifetime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Base64-encoded signing secret; `None` when not configured
    #[serde(default)]
    pub secret: Option<String>,

    /// Access token lifetime in milliseconds
    #[serde(default = "default_access_token_expiry_ms")]
    pub access_token_expiry_ms: i64,

    /// Refresh token lifetime in milliseconds
    #[serde(default = "default_refresh_token_expiry_ms")]
    pub refresh_token_expiry_ms: i64,

    /// `iss` claim written and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// `aud` claim written and required on every token
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Issue a new refresh token (and revoke the presented one) on every refresh
    #[serde(default = "default_rotate_refresh_tokens")]
    pub rotate_refresh_tokens: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            access_token_expiry_ms: default_access_token_expiry_ms(),
            refresh_token_expiry_ms: default_refresh_token_expiry_ms(),
            issuer: default_issuer(),
            audience: default_audience(),
            rotate_refresh_tokens: default_rotate_refresh_tokens(),
        }
    }
}

impl JwtConfig {
    /// Create a JWT configuration with the given base64 secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            access_token_expiry_ms: env_or("JWT_ACCESS_TOKEN_EXPIRY_MS", defaults.access_token_expiry_ms),
            refresh_token_expiry_ms: env_or("JWT_REFRESH_TOKEN_EXPIRY_MS", defaults.refresh_token_expiry_ms),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            rotate_refresh_tokens: env_or("JWT_ROTATE_REFRESH_TOKENS", defaults.rotate_refresh_tokens),
        }
    }

    /// Set access token lifetime in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_ms = minutes * 60 * 1000;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_ms = days * 86_400 * 1000;
        self
    }

    /// Access token lifetime in whole seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_ms / 1000
    }

    /// Refresh token lifetime in whole seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_ms / 1000
    }
}

/// Token cookie configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Cookie carrying the access token
    pub access_cookie_name: String,

    /// Cookie carrying the refresh token
    pub refresh_cookie_name: String,

    /// Cookie `Secure` flag (HTTPS only)
    #[serde(default = "default_secure")]
    pub secure: bool,

    /// Cookie `Path` attribute
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: String::from("access_token"),
            refresh_cookie_name: String::from("refresh_token"),
            secure: default_secure(),
            path: String::from("/"),
        }
    }
}

impl CookieConfig {
    /// Load from environment variables; `Secure` stays on unless `COOKIE_SECURE=false`
    pub fn from_env() -> Self {
        Self {
            secure: secure_flag(std::env::var("COOKIE_SECURE").ok().as_deref()),
            ..Default::default()
        }
    }
}

/// Only an explicit `false` disables the `Secure` attribute
fn secure_flag(raw: Option<&str>) -> bool {
    !matches!(raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(), Some("false"))
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Token cookie configuration
    #[serde(default)]
    pub cookie: CookieConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            cookie: CookieConfig::from_env(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_access_token_expiry_ms() -> i64 {
    3_600_000 // 1 hour
}

fn default_refresh_token_expiry_ms() -> i64 {
    604_800_000 // 7 days
}

fn default_issuer() -> String {
    String::from("act2gether")
}

fn default_audience() -> String {
    String::from("act2gether-users")
}

fn default_rotate_refresh_tokens() -> bool {
    true
}

fn default_secure() -> bool {
    true
}

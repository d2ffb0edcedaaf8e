//! Token entities for JWT-based authentication.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Which credential a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential presented on every request
    Access,
    /// Long-lived credential used only to mint new access tokens
    Refresh,
}

impl TokenType {
    /// Claim value as written into the token
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
///
/// Timestamps are epoch seconds. `iat == nbf <= exp` holds for every token this
/// crate issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account name)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID, the unit of revocation
    pub jti: String,

    /// Numeric user identity
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Account name, duplicated from `sub` for clients reading custom claims
    #[serde(rename = "userAccount")]
    pub user_account: String,

    /// Access or refresh
    #[serde(rename = "tokenType")]
    pub token_type: TokenType,

    /// Client IP captured at issuance
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
}

impl Claims {
    /// User identity carried by the token
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Account name carried by the token
    pub fn account(&self) -> &str {
        &self.user_account
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn jti(&self) -> &str {
        &self.jti
    }

    /// Expiry as a timestamp; out-of-range values clamp to the epoch
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// Issuance as a timestamp; out-of-range values clamp to the epoch
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    /// Checks expiry against `now`; a token whose `exp` equals `now` is expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Seconds left until expiry at `now`, zero once expired
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.exp - now.timestamp()).max(0)
    }
}

/// An access/refresh pair handed to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    ///
    /// # Arguments
    ///
    /// * `access_token` - The JWT access token
    /// * `refresh_token` - The JWT refresh token
    /// * `access_expires_in` - Access token lifetime in seconds
    /// * `refresh_expires_in` - Refresh token lifetime in seconds
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

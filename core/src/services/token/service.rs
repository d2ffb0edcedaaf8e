//! Main token service implementation

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use rand::RngCore;
use tracing::{debug, error, warn};

use ag_shared::utils::masking::{mask_id, mask_ip};

use crate::domain::entities::token::{Claims, TokenPair, TokenType};
use crate::domain::value_objects::SessionState;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::revocation::RevocationGate;
use crate::services::clock::{Clock, SystemClock};
use crate::services::sanitizer::sanitize_ip_address;

use super::config::TokenServiceConfig;
use super::keys::SigningKeys;

/// Signing algorithm for every token this service issues or accepts
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Random bytes behind each jti
const JTI_BYTES: usize = 32;

/// Service issuing, verifying and revoking JWT access and refresh tokens
///
/// Issuance and parsing are synchronous and do no I/O. Only the steps that
/// consult the [`RevocationGate`] are async.
pub struct TokenService {
    config: TokenServiceConfig,
    keys: SigningKeys,
    validation: Validation,
    pub(crate) gate: Arc<dyn RevocationGate>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    /// * `gate` - Revocation gate consulted on every validation
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `DomainError::Configuration` when the secret is
    /// missing or weak
    pub fn new(config: TokenServiceConfig, gate: Arc<dyn RevocationGate>) -> Result<Self, DomainError> {
        Self::with_clock(config, gate, Arc::new(SystemClock))
    }

    /// Creates a token service with an explicit time source
    pub fn with_clock(
        config: TokenServiceConfig,
        gate: Arc<dyn RevocationGate>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let keys = SigningKeys::from_secret(config.secret.as_deref())?;

        // Time, issuer and audience are checked by hand against the injected clock
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Ok(Self {
            config,
            keys,
            validation,
            gate,
            clock,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Lifetime in seconds of tokens of the given type
    pub fn ttl_seconds(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.config.access_token_ttl_seconds(),
            TokenType::Refresh => self.config.refresh_token_ttl_seconds(),
        }
    }

    /// Issues a signed token
    ///
    /// # Arguments
    ///
    /// * `user_id` - Numeric identity
    /// * `account` - Account name, written to `sub` and `userAccount`
    /// * `token_type` - Access or refresh; selects the lifetime
    /// * `client_ip` - Client address bound into the token
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact JWT
    /// * `Err(DomainError::Validation)` - The account is blank; such a token could never be refreshed
    /// * `Err(DomainError)` - Signing failed
    pub fn issue(
        &self,
        user_id: i64,
        account: &str,
        token_type: TokenType,
        client_ip: &str,
    ) -> Result<String, DomainError> {
        if account.trim().is_empty() {
            warn!(user_id, "Refusing to issue a token without an account");
            return Err(DomainError::Validation {
                message: "account must not be empty".to_string(),
            });
        }

        let now = self.clock.now().timestamp();
        let claims = Claims {
            sub: account.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now,
            nbf: now,
            exp: now + self.ttl_seconds(token_type),
            jti: generate_jti(),
            user_id,
            user_account: account.to_string(),
            token_type,
            ip_address: sanitize_ip_address(client_ip),
        };

        let token = self.encode_jwt(&claims)?;
        debug!(user_id, token_type = %token_type, jti = %mask_id(&claims.jti), "Token issued");
        Ok(token)
    }

    /// Issues an access token and a refresh token for the same identity
    pub fn issue_pair(&self, user_id: i64, account: &str, client_ip: &str) -> Result<TokenPair, DomainError> {
        let access_token = self.issue(user_id, account, TokenType::Access, client_ip)?;
        let refresh_token = self.issue(user_id, account, TokenType::Refresh, client_ip)?;
        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_ttl_seconds(),
            self.config.refresh_token_ttl_seconds(),
        ))
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(SIGNING_ALGORITHM);
        encode(&header, claims, &self.keys.encoding).map_err(|e| {
            error!(error = %e, "Failed to sign token");
            DomainError::Token(TokenError::GenerationFailed)
        })
    }

    /// Parses and verifies a token without consulting the revocation gate
    ///
    /// Checks signature, algorithm, required claims, issuer, audience, not-before
    /// and expiry, in that order. A token whose `exp` equals the current second is
    /// expired.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The verified claims
    /// * `Err(DomainError::Token)` - The typed reason the token was rejected
    pub fn parse(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode_claims(token)?;

        if claims.iss != self.config.issuer {
            return Err(TokenError::IssuerMismatch.into());
        }
        if claims.aud != self.config.audience {
            return Err(TokenError::AudienceMismatch.into());
        }

        let now = self.clock.now();
        if now.timestamp() < claims.nbf {
            return Err(TokenError::NotYetValid.into());
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired.into());
        }

        Ok(claims)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }

        let header = decode_header(token).map_err(|e| match e.kind() {
            ErrorKind::Json(_) if names_an_algorithm(token) => TokenError::Unsupported,
            _ => TokenError::Malformed,
        })?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(TokenError::Unsupported);
        }

        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => TokenError::Unsupported,
                ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
                    claim: claim.clone(),
                },
                _ => TokenError::Malformed,
            })
    }

    /// Verifies a token and checks it against the revocation gate
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The token is valid and not revoked
    /// * `Err(DomainError::Token)` - Verification failed
    /// * `Err(DomainError::Auth(AuthError::TokenRevoked))` - The jti was revoked
    /// * `Err(DomainError::Internal)` - The revocation store could not be reached
    pub async fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.parse(token)?;

        if self.gate.is_revoked(&claims.jti).await? {
            warn!(user_id = claims.user_id, jti = %mask_id(&claims.jti), "Rejected revoked token");
            return Err(AuthError::TokenRevoked.into());
        }

        Ok(claims)
    }

    /// Validates a token and compares the bound IP with the caller's
    ///
    /// A differing IP is logged and otherwise ignored; mobile and NATed clients
    /// change address routinely.
    pub async fn validate_with_ip(&self, token: &str, current_ip: Option<&str>) -> Result<Claims, DomainError> {
        let claims = self.validate(token).await?;

        if let Some(ip) = current_ip.map(str::trim).filter(|ip| !ip.is_empty()) {
            if ip != claims.ip_address {
                warn!(
                    user_id = claims.user_id,
                    bound_ip = %mask_ip(&claims.ip_address),
                    current_ip = %mask_ip(ip),
                    "Token presented from a different IP address"
                );
            }
        }

        Ok(claims)
    }

    /// Returns `true` only for a valid, unrevoked token; never errors
    pub async fn is_valid(&self, token: &str, current_ip: Option<&str>) -> bool {
        match self.validate_with_ip(token, current_ip).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Token failed validation");
                false
            }
        }
    }

    /// Classifies a presented access token
    ///
    /// # Returns
    ///
    /// * `Ok(SessionState::ActiveAccess)` - Valid access token
    /// * `Ok(SessionState::NeedsRefresh)` - Correctly signed access token that has expired
    /// * `Err(DomainError)` - Any other failure, including a refresh token presented
    ///   as an access token
    pub async fn session_state(&self, access_token: &str, current_ip: Option<&str>) -> Result<SessionState, DomainError> {
        match self.validate_with_ip(access_token, current_ip).await {
            Ok(claims) if claims.token_type == TokenType::Access => Ok(SessionState::ActiveAccess(claims)),
            Ok(claims) => Err(AuthError::WrongTokenType {
                expected: TokenType::Access,
                actual: claims.token_type,
            }
            .into()),
            Err(DomainError::Token(TokenError::Expired)) => Ok(SessionState::NeedsRefresh),
            Err(e) => Err(e),
        }
    }

    /// Revokes a token until its own expiry
    ///
    /// An already-expired token needs no entry and is accepted silently.
    pub async fn revoke_token(&self, token: &str) -> Result<(), DomainError> {
        let claims = match self.parse(token) {
            Ok(claims) => claims,
            Err(DomainError::Token(TokenError::Expired)) => return Ok(()),
            Err(e) => return Err(e),
        };
        self.revoke_claims(&claims).await
    }

    pub(crate) async fn revoke_claims(&self, claims: &Claims) -> Result<(), DomainError> {
        self.gate.revoke(&claims.jti, claims.expires_at()).await?;
        debug!(user_id = claims.user_id, jti = %mask_id(&claims.jti), "Token revoked until expiry");
        Ok(())
    }

    /// User identity from a verified token
    pub fn user_id_from_token(&self, token: &str) -> Result<i64, DomainError> {
        self.parse(token).map(|c| c.user_id)
    }

    /// Account name from a verified token
    pub fn account_from_token(&self, token: &str) -> Result<String, DomainError> {
        self.parse(token).map(|c| c.user_account)
    }

    /// Bound IP from a verified token
    pub fn ip_address_from_token(&self, token: &str) -> Result<String, DomainError> {
        self.parse(token).map(|c| c.ip_address)
    }

    /// Token type from a verified token
    pub fn token_type_from_token(&self, token: &str) -> Result<TokenType, DomainError> {
        self.parse(token).map(|c| c.token_type)
    }

    /// jti from a verified token
    pub fn jti_from_token(&self, token: &str) -> Result<String, DomainError> {
        self.parse(token).map(|c| c.jti)
    }

    /// Expiry from a verified token
    pub fn expiration_from_token(&self, token: &str) -> Result<DateTime<Utc>, DomainError> {
        self.parse(token).map(|c| c.expires_at())
    }
}

/// 32 bytes from the thread-local CSPRNG, URL-safe base64 without padding
fn generate_jti() -> String {
    let mut bytes = [0u8; JTI_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Whether the header segment is JSON with an `alg` string we could not parse
fn names_an_algorithm(token: &str) -> bool {
    token
        .split('.')
        .next()
        .and_then(|segment| URL_SAFE_NO_PAD.decode(segment).ok())
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .and_then(|header| header.get("alg").map(|alg| alg.is_string()))
        .unwrap_or(false)
}

//! Access token renewal from a refresh token

use tracing::{info, warn};

use crate::domain::entities::token::{Claims, TokenPair, TokenType};
use crate::errors::{AuthError, DomainError};

use super::service::TokenService;

impl TokenService {
    /// Issues a new access token from a valid refresh token
    ///
    /// The refresh token itself is left untouched and stays valid until it
    /// expires. Prefer [`TokenService::refresh_with_rotation`] unless clients rely
    /// on reusing the same refresh token.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The presented refresh token
    /// * `current_ip` - Caller's address, bound into the new access token
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - A new access token
    /// * `Err(DomainError::Auth)` - Invalid, revoked or wrong-type token
    pub async fn refresh(&self, refresh_token: &str, current_ip: &str) -> Result<String, DomainError> {
        let claims = self.verified_refresh_claims(refresh_token, current_ip).await?;
        self.issue(claims.user_id, &claims.user_account, TokenType::Access, current_ip)
    }

    /// Issues a new access/refresh pair and revokes the presented refresh token
    ///
    /// The old jti is revoked until its own expiry before the new pair is signed,
    /// so a replayed refresh token is rejected as revoked.
    pub async fn refresh_with_rotation(&self, refresh_token: &str, current_ip: &str) -> Result<TokenPair, DomainError> {
        let claims = self.verified_refresh_claims(refresh_token, current_ip).await?;
        self.revoke_claims(&claims).await?;

        let pair = self.issue_pair(claims.user_id, &claims.user_account, current_ip)?;
        info!(user_id = claims.user_id, "Refresh token rotated");
        Ok(pair)
    }

    /// Validates a refresh token, trusting nothing but the verified claims
    async fn verified_refresh_claims(&self, token: &str, current_ip: &str) -> Result<Claims, DomainError> {
        let claims = self
            .validate_with_ip(token, Some(current_ip))
            .await
            .map_err(|e| match e {
                DomainError::Token(reason) => {
                    warn!(error = %reason, "Refresh rejected");
                    DomainError::Auth(AuthError::AuthenticationFailed)
                }
                other => other,
            })?;

        if claims.token_type != TokenType::Refresh {
            warn!(user_id = claims.user_id, "Refresh attempted with an access token");
            return Err(AuthError::WrongTokenType {
                expected: TokenType::Refresh,
                actual: claims.token_type,
            }
            .into());
        }

        if claims.user_account.is_empty() || claims.sub != claims.user_account {
            return Err(AuthError::MissingIdentity.into());
        }

        Ok(claims)
    }
}

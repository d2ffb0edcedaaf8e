//! Signing key derivation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::{DecodingKey, EncodingKey};

use ag_shared::config::MIN_SECRET_LENGTH;

use crate::errors::DomainError;

/// HMAC key pair derived from the configured secret
///
/// Read-only after construction and shared by every request.
#[derive(Clone)]
pub struct SigningKeys {
    pub(crate) encoding: EncodingKey,
    pub(crate) decoding: DecodingKey,
}

impl SigningKeys {
    /// Derives the keys from a base64-encoded secret
    ///
    /// # Arguments
    ///
    /// * `secret` - The configured secret, as written in configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKeys)` - Keys for the decoded secret bytes
    /// * `Err(DomainError::Configuration)` - Secret missing, shorter than 32
    ///   characters, or not valid base64
    pub fn from_secret(secret: Option<&str>) -> Result<Self, DomainError> {
        let secret = secret.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
            DomainError::Configuration {
                message: "JWT secret is not configured".to_string(),
            }
        })?;

        if secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(DomainError::Configuration {
                message: format!("JWT secret must be at least {} characters", MIN_SECRET_LENGTH),
            });
        }

        let bytes = STANDARD.decode(secret).map_err(|e| DomainError::Configuration {
            message: format!("JWT secret is not valid base64: {}", e),
        })?;

        Ok(Self {
            encoding: EncodingKey::from_secret(&bytes),
            decoding: DecodingKey::from_secret(&bytes),
        })
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKeys(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 48 base64 chars, 35 bytes decoded
    const SECRET: &str = "dGhpcy1pcy1hLXZlcnktbG9uZy10ZXN0LXNlY3JldC1rZXk=";

    #[test]
    fn test_valid_secret() {
        assert!(SigningKeys::from_secret(Some(SECRET)).is_ok());
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(
            SigningKeys::from_secret(None),
            Err(DomainError::Configuration { .. })
        ));
        assert!(matches!(
            SigningKeys::from_secret(Some("   ")),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_short_secret() {
        assert!(matches!(
            SigningKeys::from_secret(Some("c2hvcnQtc2VjcmV0")),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_non_base64_secret() {
        let secret = "this secret has spaces and is not base64!!";
        assert!(matches!(
            SigningKeys::from_secret(Some(secret)),
            Err(DomainError::Configuration { .. })
        ));
    }
}

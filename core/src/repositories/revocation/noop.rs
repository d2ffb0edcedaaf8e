//! No-op revocation gate

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RevocationGate;
use crate::errors::DomainError;

/// Gate that never reports a token as revoked and discards revocations
///
/// Logout cannot invalidate a token while this gate is in use; tokens stay
/// valid until they expire. Use it only where revocation is deliberately off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRevocationGate;

impl NoopRevocationGate {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RevocationGate for NoopRevocationGate {
    async fn is_revoked(&self, _jti: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn revoke(&self, _jti: &str, _expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        Ok(())
    }
}

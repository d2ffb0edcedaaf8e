//! Revocation gate trait: the pluggable record of revoked token identifiers

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Check and record revoked token identifiers (jti)
///
/// The token service consults the gate before declaring any token valid. Entries
/// only need to live until the token's own expiry; after that the signature
/// check rejects the token anyway.
///
/// Implementations backed by a shared store must provide their own cross-process
/// consistency. In-process locking is not enough once several servers share a
/// store.
#[async_trait]
pub trait RevocationGate: Send + Sync {
    /// Whether the identifier has been revoked and the entry has not expired
    ///
    /// # Arguments
    /// * `jti` - Token identifier
    ///
    /// # Returns
    /// * `Ok(true)` - Revoked
    /// * `Ok(false)` - Unknown or expired entry
    /// * `Err(DomainError)` - Backing store unavailable
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError>;

    /// Records a revocation that stays in force until `expires_at`
    ///
    /// # Arguments
    /// * `jti` - Token identifier
    /// * `expires_at` - The token's own expiry; entries may be dropped after it
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Drops entries whose expiry has passed
    ///
    /// Stores with native expiry have nothing to do.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries removed
    async fn purge_expired(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}

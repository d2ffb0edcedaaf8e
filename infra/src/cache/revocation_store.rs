//! Redis-backed revocation gate

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

use ag_core::errors::DomainError;
use ag_core::repositories::RevocationGate;
use ag_core::services::clock::{Clock, SystemClock};
use ag_shared::masking::mask_id;

use super::RedisClient;

/// Namespace of revoked-identifier keys, before the configured prefix
pub const REVOKED_KEY_PREFIX: &str = "revoked:jti:";

/// Revocation gate storing `revoked:jti:{jti}` keys that expire with the token
///
/// Redis expiry removes entries, so there is nothing to purge. The store is
/// shared by every server pointing at the same Redis, which makes logout effective
/// across instances.
#[derive(Clone)]
pub struct RedisRevocationGate {
    client: RedisClient,
    clock: Arc<dyn Clock>,
}

impl RedisRevocationGate {
    pub fn new(client: RedisClient) -> Self {
        Self::with_clock(client, Arc::new(SystemClock))
    }

    pub fn with_clock(client: RedisClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    pub(crate) fn key(jti: &str) -> String {
        format!("{}{}", REVOKED_KEY_PREFIX, jti)
    }

    /// Seconds until `expires_at`, rounded up; `None` once it has passed
    pub(crate) fn ttl_seconds(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Option<u64> {
        let millis = (expires_at - now).num_milliseconds();
        if millis <= 0 {
            return None;
        }
        Some(((millis + 999) / 1000) as u64)
    }
}

#[async_trait]
impl RevocationGate for RedisRevocationGate {
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
        self.client.exists(&Self::key(jti)).await.map_err(|e| {
            error!(jti = %mask_id(jti), error = %e, "Revocation lookup failed");
            DomainError::from(e)
        })
    }

    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let ttl = match Self::ttl_seconds(self.clock.now(), expires_at) {
            Some(ttl) => ttl,
            None => {
                debug!(jti = %mask_id(jti), "Token already expired, revocation not stored");
                return Ok(());
            }
        };

        self.client
            .set_with_expiry(&Self::key(jti), "1", ttl)
            .await
            .map_err(DomainError::from)?;

        debug!(jti = %mask_id(jti), ttl_seconds = ttl, "Token identifier revoked");
        Ok(())
    }
}

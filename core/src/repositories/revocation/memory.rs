//! Bounded in-process revocation gate

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use ag_shared::utils::masking::mask_id;

use super::RevocationGate;
use crate::errors::DomainError;
use crate::services::clock::{Clock, SystemClock};

/// Default upper bound on tracked identifiers
pub const DEFAULT_MAX_ENTRIES: usize = 100_000;

/// Revocation gate holding identifiers in memory until their tokens expire
///
/// Capacity is bounded. When full, expired entries are purged first; if that frees
/// nothing, the entry closest to expiry is evicted, because it is the one whose
/// token would stop validating soonest anyway.
///
/// Entries are lost on restart and are not shared between processes.
pub struct InMemoryRevocationGate {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl InMemoryRevocationGate {
    /// Creates a gate with the default capacity and the system clock
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES, Arc::new(SystemClock))
    }

    /// Creates a gate with an explicit capacity and clock
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            clock,
        }
    }

    /// Number of entries currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn evict_soonest(entries: &mut HashMap<String, DateTime<Utc>>) {
        let victim = entries
            .iter()
            .min_by_key(|(_, expires_at)| **expires_at)
            .map(|(jti, _)| jti.clone());
        if let Some(jti) = victim {
            entries.remove(&jti);
            warn!(jti = %mask_id(&jti), "Revocation store full, evicted entry closest to expiry");
        }
    }
}

impl Default for InMemoryRevocationGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationGate for InMemoryRevocationGate {
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries.get(jti).map(|expires_at| *expires_at > now).unwrap_or(false))
    }

    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let now = self.clock.now();
        if expires_at <= now {
            // Token already expired; nothing left to block
            return Ok(());
        }

        let mut entries = self.entries.write().await;
        if !entries.contains_key(jti) && entries.len() >= self.max_entries {
            entries.retain(|_, exp| *exp > now);
            if entries.len() >= self.max_entries {
                Self::evict_soonest(&mut entries);
            }
        }

        let slot = entries.entry(jti.to_string()).or_insert(expires_at);
        if *slot < expires_at {
            *slot = expires_at;
        }
        debug!(jti = %mask_id(jti), %expires_at, "Token revoked");
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, exp| *exp > now);
        Ok(before - entries.len())
    }
}

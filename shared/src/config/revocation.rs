//! Token revocation store configuration

use serde::{Deserialize, Serialize};

/// Which revocation store backs the token service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationBackend {
    /// Bounded in-process map; lost on restart
    Memory,
    /// Shared Redis keys with native expiry
    Redis,
    /// Nothing is ever revoked
    Noop,
}

impl Default for RevocationBackend {
    fn default() -> Self {
        RevocationBackend::Memory
    }
}

impl std::str::FromStr for RevocationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(RevocationBackend::Memory),
            "redis" => Ok(RevocationBackend::Redis),
            "noop" | "none" | "disabled" => Ok(RevocationBackend::Noop),
            _ => Err(format!("Invalid revocation backend: {}", s)),
        }
    }
}

/// Revocation store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: RevocationBackend,

    /// Upper bound on entries held by the in-memory store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// How often expired entries are purged, in seconds
    #[serde(default = "default_purge_interval")]
    pub purge_interval_seconds: u64,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            backend: RevocationBackend::default(),
            max_entries: default_max_entries(),
            purge_interval_seconds: default_purge_interval(),
        }
    }
}

impl RevocationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: std::env::var("REVOCATION_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend),
            max_entries: std::env::var("REVOCATION_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            purge_interval_seconds: std::env::var("REVOCATION_PURGE_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval_seconds),
        }
    }
}

fn default_max_entries() -> usize {
    100_000
}

fn default_purge_interval() -> u64 {
    300 // 5 minutes
}

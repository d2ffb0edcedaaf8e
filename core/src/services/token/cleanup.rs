//! Periodic purge of expired revocation entries
//!
//! Stores with native expiry (Redis) report zero; the in-memory store drops
//! entries whose tokens can no longer validate anyway.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use ag_shared::config::RevocationConfig;

use crate::errors::DomainError;
use crate::repositories::revocation::RevocationGate;

/// Configuration for the revocation cleanup service
#[derive(Debug, Clone)]
pub struct RevocationCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for RevocationCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300, // Run every 5 minutes
            enabled: true,
        }
    }
}

impl From<&RevocationConfig> for RevocationCleanupConfig {
    fn from(config: &RevocationConfig) -> Self {
        Self {
            interval_seconds: config.purge_interval_seconds.max(1),
            enabled: true,
        }
    }
}

/// Service purging expired revocation entries
pub struct RevocationCleanupService {
    gate: Arc<dyn RevocationGate>,
    config: RevocationCleanupConfig,
}

impl RevocationCleanupService {
    /// Create a new cleanup service
    pub fn new(gate: Arc<dyn RevocationGate>, config: RevocationCleanupConfig) -> Self {
        Self { gate, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle; store failures are collected, not raised
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.gate.purge_expired().await {
            Ok(count) => {
                result.entries_purged = count;
                if count > 0 {
                    info!("Purged {} expired revocation entries", count);
                }
            }
            Err(e) => {
                error!("Failed to purge revocation entries: {}", e);
                result.errors.push(format!("Revocation purge error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Revocation cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Revocation cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Revocation cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired entries removed
    pub entries_purged: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

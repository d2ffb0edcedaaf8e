//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Signing key derivation from the configured secret
//! - Access/refresh token issuance and verification (HS512)
//! - Refresh, with or without refresh token rotation
//! - Revocation through a pluggable gate and its background cleanup

mod cleanup;
mod config;
mod keys;
mod refresh;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, RevocationCleanupConfig, RevocationCleanupService};
pub use config::TokenServiceConfig;
pub use keys::SigningKeys;
pub use service::{TokenService, SIGNING_ALGORITHM};

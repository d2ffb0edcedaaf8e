//! # Infrastructure Layer
//!
//! Durable adapters for the Act2Gether security core.
//!
//! ## Architecture
//!
//! - **Cache**: Redis client with connection retry, and the Redis-backed
//!   [`RevocationGate`](ag_core::repositories::RevocationGate) implementation
//!
//! ## Features
//!
//! - `redis-cache`: Enable Redis support (default)

use ag_core::errors::DomainError;

/// Cache module - Redis client and revocation store
pub mod cache;

pub use cache::{RedisClient, RedisRevocationGate};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Configuration { message },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}

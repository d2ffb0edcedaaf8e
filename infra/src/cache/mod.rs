//! Cache module for Redis-backed state
//!
//! Provides the Redis client (multiplexed connection, retry with backoff) and the
//! revocation gate that stores revoked token identifiers with native expiry.

pub mod redis_client;
pub mod revocation_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use revocation_store::{RedisRevocationGate, REVOKED_KEY_PREFIX};

// Re-export commonly used types
pub use ag_shared::config::CacheConfig;

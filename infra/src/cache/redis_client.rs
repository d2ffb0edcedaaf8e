//! Redis cache client implementation
//!
//! A thin async client over a multiplexed connection, with connection retry and
//! per-operation retry on transient errors. Keys passed in are namespaced with the
//! configured prefix.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::cache::CacheConfig;
use crate::InfrastructureError;

/// Base delay before the first retry
const RETRY_DELAY_MS: u64 = 100;

/// Upper bound on the backoff delay
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with connection retry logic
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    /// Maximum number of attempts for connecting and for each operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the retry count from the configuration
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        Self::new_with_retry_config(config, max_retries, RETRY_DELAY_MS).await
    }

    /// Connect with an explicit retry policy
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    /// * `max_retries` - Maximum number of attempts
    /// * `retry_delay_ms` - Base delay between retries in milliseconds
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let connection =
            Self::create_connection_with_retry(client, max_retries, retry_delay_ms, connect_timeout)
                .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            max_retries,
            retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::General(format!(
                    "Redis connection timed out after {}s",
                    connect_timeout.as_secs()
                ))),
            };

            match outcome {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Set a value with expiration time
    ///
    /// # Arguments
    /// * `key` - Cache key (prefix is added here)
    /// * `value` - Value to store
    /// * `expiry_seconds` - Time to live in seconds
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = self.config.make_key(key);
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        let value = value.to_string();
        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.config.make_key(key);

        let exists = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.exists::<_, bool>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to check key '{}' existence: {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        debug!("Key '{}' exists: {}", key, exists);
        Ok(exists)
    }

    /// Delete a key
    ///
    /// # Returns
    /// * `Ok(true)` - The key existed and was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.config.make_key(key);

        let deleted = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to delete key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted > 0)
    }

    /// Remaining time-to-live of a key
    ///
    /// # Returns
    /// * `Ok(None)` - The key does not exist or has no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let key = self.config.make_key(key);

        let ttl = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to get TTL for key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok((ttl >= 0).then_some(ttl))
    }

    /// Check if the Redis connection is healthy with a PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response != "PONG" {
            warn!("Redis health check returned unexpected response: {}", response);
        }
        Ok(response == "PONG")
    }

    /// Run an operation, retrying transient failures with exponential backoff
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether a Redis error is transient and worth retrying
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}

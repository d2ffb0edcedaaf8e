//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing, lifetimes and cookie transport
//! - `cache` - Redis connection settings
//! - `environment` - environment detection and logging configuration
//! - `revocation` - revocation store selection and bounds
//! - `server` - HTTP server configuration
//! - `upload` - upload size and image dimension limits

pub mod auth;
pub mod cache;
pub mod environment;
pub mod revocation;
pub mod server;
pub mod upload;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, CookieConfig, JwtConfig, MIN_SECRET_LENGTH};
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use revocation::{RevocationBackend, RevocationConfig};
pub use server::ServerConfig;
pub use upload::UploadConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Upload validation limits
    #[serde(default)]
    pub upload: UploadConfig,

    /// Revocation store configuration
    #[serde(default)]
    pub revocation: RevocationConfig,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            upload: UploadConfig::default(),
            revocation: RevocationConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let env = Environment::from_env();

        Self {
            environment: env,
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            upload: UploadConfig::from_env(),
            revocation: RevocationConfig::from_env(),
            cache: CacheConfig::from_env(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.revocation.backend, RevocationBackend::Memory);
        assert!(config.auth.cookie.secure);
    }

    #[test]
    fn test_from_env_keeps_secure_cookies_without_environment() {
        for key in ["ENVIRONMENT", "ENV", "RUST_ENV", "COOKIE_SECURE"] {
            std::env::remove_var(key);
        }

        let config = AppConfig::from_env();
        assert_eq!(config.environment, Environment::Development);
        assert!(config.auth.cookie.secure);
    }
}

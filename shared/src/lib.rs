//! Shared configuration and common types for the Act2Gether server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes
//! - Log masking helpers for untrusted or sensitive values
//! - Health response types

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CookieConfig, Environment, JwtConfig, LoggingConfig,
    RevocationBackend, RevocationConfig, ServerConfig, UploadConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use types::{HealthResponse, HealthStatus};
pub use utils::masking;

//! Business services containing the security logic.

pub mod clock;
pub mod file_security;
pub mod sanitizer;
pub mod token;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use file_security::{generate_storage_filename, FileSecurityValidator};
pub use token::{
    CleanupResult, RevocationCleanupConfig, RevocationCleanupService, TokenService,
    TokenServiceConfig,
};

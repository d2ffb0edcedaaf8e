//! # Act2Gether Core
//!
//! Security core for the Act2Gether backend: token lifecycle (issue, validate,
//! refresh, revoke), input sanitization and upload validation, together with the
//! domain types and error taxonomy they share.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::{InMemoryRevocationGate, NoopRevocationGate, RevocationGate};
pub use services::{
    Clock, FileSecurityValidator, ManualClock, RevocationCleanupService, SystemClock,
    TokenService, TokenServiceConfig,
};

//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{AuthError, SecurityViolation, TokenError};

use ag_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Fatal at startup: missing or weak signing secret
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Security(#[from] SecurityViolation),
}

impl DomainError {
    /// Whether the error means "this caller is not authenticated"
    pub fn is_authentication_failure(&self) -> bool {
        match self {
            DomainError::Token(_) => true,
            DomainError::Auth(AuthError::InsufficientPermissions) => false,
            DomainError::Auth(_) => true,
            _ => false,
        }
    }

    /// Whether the error is an expired (but otherwise well-formed) token
    pub fn is_expired_token(&self) -> bool {
        matches!(self, DomainError::Token(TokenError::Expired))
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Token(e) => e.to_error_response(),
            DomainError::Auth(e) => e.to_error_response(),
            DomainError::Security(e) => e.to_error_response(),
            DomainError::Validation { .. } => {
                ErrorResponse::new(error_codes::BAD_REQUEST, "Invalid request")
            }
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

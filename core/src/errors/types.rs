//! Error families for token handling, authentication and input security
//!
//! Messages produced here are safe to log. What reaches a client is decided by
//! [`IntoErrorResponse`], which deliberately returns generic text.

use ag_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

use crate::domain::entities::token::TokenType;

/// Token parsing and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Unsupported token algorithm")]
    Unsupported,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Issuer mismatch")]
    IssuerMismatch,

    #[error("Audience mismatch")]
    AudienceMismatch,

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Authentication errors raised after a token has been parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongTokenType { expected: TokenType, actual: TokenType },

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Missing identity")]
    MissingIdentity,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Rejections from the input sanitizer and the file security validator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityViolation {
    #[error("Script injection pattern detected")]
    XssDetected,

    #[error("SQL keyword pattern detected")]
    SqlInjectionDetected,

    #[error("Input contains disallowed characters")]
    DisallowedCharacters,

    #[error("Input exceeds {max} characters")]
    InputTooLong { max: usize },

    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("File extension not allowed: {extension}")]
    ExtensionNotAllowed { extension: String },

    #[error("Content type not allowed: {mime}")]
    MimeTypeNotAllowed { mime: String },

    #[error("Declared type does not match file content")]
    ContentMismatch,

    #[error("File content is not a decodable image")]
    UndecodableImage,

    #[error("Image dimensions {width}x{height} exceed {max_width}x{max_height}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Unsafe filename: {reason}")]
    UnsafeFilename { reason: &'static str },
}

impl TokenError {
    /// Stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Expired => error_codes::TOKEN_EXPIRED,
            _ => error_codes::TOKEN_INVALID,
        }
    }
}

impl AuthError {
    /// Stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TokenRevoked => error_codes::TOKEN_REVOKED,
            AuthError::InsufficientPermissions => error_codes::FORBIDDEN,
            _ => error_codes::UNAUTHORIZED,
        }
    }
}

impl SecurityViolation {
    /// Stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            SecurityViolation::XssDetected
            | SecurityViolation::SqlInjectionDetected
            | SecurityViolation::DisallowedCharacters
            | SecurityViolation::InputTooLong { .. } => error_codes::SECURITY_VIOLATION,
            _ => error_codes::INVALID_FILE,
        }
    }

    /// Whether this violation came from the upload checks
    pub fn is_file_violation(&self) -> bool {
        self.code() == error_codes::INVALID_FILE
    }
}

impl IntoErrorResponse for TokenError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            TokenError::Expired => ErrorResponse::new(self.code(), "Session expired"),
            _ => ErrorResponse::new(self.code(), "Invalid authentication token"),
        }
    }
}

impl IntoErrorResponse for AuthError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            AuthError::InsufficientPermissions => {
                ErrorResponse::new(self.code(), "Insufficient permissions")
            }
            _ => ErrorResponse::new(self.code(), "Authentication required"),
        }
    }
}

impl IntoErrorResponse for SecurityViolation {
    fn to_error_response(&self) -> ErrorResponse {
        if self.is_file_violation() {
            ErrorResponse::new(self.code(), "Uploaded file was rejected")
        } else {
            ErrorResponse::new(self.code(), "Input was rejected")
        }
    }
}

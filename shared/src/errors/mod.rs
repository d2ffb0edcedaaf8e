//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
///
/// Messages are deliberately generic; specifics stay in server logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional non-sensitive details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
    pub const SECURITY_VIOLATION: &str = "SECURITY_VIOLATION";
    pub const INVALID_FILE: &str = "INVALID_FILE";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Session expired");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "TOKEN_EXPIRED");
        assert_eq!(json["message"], "Session expired");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_response_add_detail() {
        let response = ErrorResponse::new(error_codes::INVALID_FILE, "Invalid file")
            .add_detail("max_size", 3_145_728u64);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["details"]["max_size"], 3_145_728);
    }
}

//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Individual component checks, keyed by component name
    pub services: HashMap<String, HealthStatus>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serializes_lowercase_status() {
        let mut services = HashMap::new();
        services.insert("revocation_store".to_string(), HealthStatus::Unhealthy);
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            services,
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["services"]["revocation_store"], "unhealthy");
    }
}

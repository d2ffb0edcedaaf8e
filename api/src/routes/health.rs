use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use ag_shared::{HealthResponse, HealthStatus};

use crate::app::AppState;

/// Handler for GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let mut services = HashMap::new();
    services.insert(String::from("token_service"), HealthStatus::Healthy);

    if let Some(redis) = &state.redis {
        let status = match redis.health_check().await {
            Ok(true) => HealthStatus::Healthy,
            Ok(false) => HealthStatus::Degraded,
            Err(e) => {
                log::warn!("Revocation store health check failed: {}", e);
                HealthStatus::Unhealthy
            }
        };
        services.insert(String::from("revocation_store"), status);
    }

    let status = if services.values().all(|s| *s == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    HttpResponse::Ok().json(HealthResponse {
        status,
        services,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

use std::io::Write;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use log::{error, info, warn};

use ag_api::app::{create_app, AppState};
use ag_core::repositories::{InMemoryRevocationGate, NoopRevocationGate, RevocationGate};
use ag_core::services::clock::SystemClock;
use ag_core::services::token::{RevocationCleanupService, TokenService, TokenServiceConfig};
use ag_infra::cache::{RedisClient, RedisRevocationGate};
use ag_shared::config::{AppConfig, Environment, LogFormat, LoggingConfig, RevocationBackend};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment-specific file first; values already set are never overridden
    dotenv::from_filename(Environment::from_env().env_file()).ok();
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();
    init_logger(&config.logging);

    info!("Starting Act2Gether API Server ({})", config.environment);

    let mut redis_client = None;
    let gate: Arc<dyn RevocationGate> = match config.revocation.backend {
        RevocationBackend::Memory => Arc::new(InMemoryRevocationGate::with_capacity(
            config.revocation.max_entries,
            Arc::new(SystemClock),
        )),
        RevocationBackend::Redis => {
            let client = RedisClient::new(config.cache.clone())
                .await
                .map_err(|e| startup_error("Redis revocation store unavailable", e))?;
            redis_client = Some(client.clone());
            Arc::new(RedisRevocationGate::new(client))
        }
        RevocationBackend::Noop => {
            warn!("Token revocation is disabled; logout will not invalidate tokens");
            Arc::new(NoopRevocationGate::new())
        }
    };

    let token_service = TokenService::new(TokenServiceConfig::from(&config.auth.jwt), Arc::clone(&gate))
        .map_err(|e| startup_error("Token service misconfigured", e))?;

    if config.revocation.backend == RevocationBackend::Memory {
        let cleanup = RevocationCleanupService::new(Arc::clone(&gate), (&config.revocation).into());
        // Detached; runs for the life of the process
        let _ = Arc::new(cleanup).start_background_task();
    }

    let mut state = AppState::new(Arc::new(token_service), config.auth.cookie.clone());
    if let Some(client) = redis_client {
        state = state.with_redis(client);
    }
    let state = web::Data::new(state);

    let bind_address = config.server.bind_address();
    let max_payload = config.server.max_payload_size;
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(state.clone()).app_data(web::JsonConfig::default().limit(max_payload))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await
}

/// Text lines in development, one JSON object per line elsewhere
fn init_logger(logging: &LoggingConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(logging.filter_directive()));

    if logging.format == LogFormat::Json {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{}",
                serde_json::json!({
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "message": record.args().to_string(),
                })
            )
        });
    }

    builder.init();
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

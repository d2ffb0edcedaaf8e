//! Application state and factory
//!
//! This module holds the shared state handed to every worker and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{body::MessageBody, middleware::Logger, web, App, HttpResponse};

use ag_core::services::token::TokenService;
use ag_infra::cache::RedisClient;
use ag_shared::config::CookieConfig;

use crate::middleware::auth::JwtAuth;
use crate::routes::{auth, health};

/// State shared by all handlers and the auth middleware
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub cookie: CookieConfig,
    /// Present when revocations live in Redis; reported by `/health`
    pub redis: Option<RedisClient>,
}

impl AppState {
    pub fn new(token_service: Arc<TokenService>, cookie: CookieConfig) -> Self {
        Self {
            token_service,
            cookie,
            redis: None,
        }
    }

    pub fn with_redis(mut self, client: RedisClient) -> Self {
        self.redis = Some(client);
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .route("/health", web::get().to(health::health))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/refresh", web::post().to(auth::refresh::refresh))
                    .service(
                        web::resource("/logout")
                            .wrap(JwtAuth::new())
                            .route(web::post().to(auth::logout::logout)),
                    ),
            ),
        )
        .default_service(web::route().to(|| async {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "NOT_FOUND",
                "message": "The requested resource was not found"
            }))
        }))
}

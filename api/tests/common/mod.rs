//! Shared fixtures for HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use ag_api::app::AppState;
use ag_core::domain::entities::token::TokenType;
use ag_core::repositories::InMemoryRevocationGate;
use ag_core::services::clock::ManualClock;
use ag_core::services::token::{TokenService, TokenServiceConfig};
use ag_shared::config::CookieConfig;

/// Base64 of a 35-character test key
pub const TEST_SECRET: &str = "dGhpcy1pcy1hLXZlcnktbG9uZy10ZXN0LXNlY3JldC1rZXk=";

pub const START: i64 = 1_700_000_000;

pub const USER_ID: i64 = 42;
pub const ACCOUNT: &str = "hong@example.com";

pub struct Harness {
    pub state: web::Data<AppState>,
    pub service: Arc<TokenService>,
    pub gate: Arc<InMemoryRevocationGate>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(rotate_refresh_tokens: bool) -> Self {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let gate = Arc::new(InMemoryRevocationGate::with_capacity(1_000, clock.clone()));

        let mut config = TokenServiceConfig::with_secret(TEST_SECRET);
        config.rotate_refresh_tokens = rotate_refresh_tokens;

        let service = Arc::new(
            TokenService::with_clock(config, gate.clone(), clock.clone()).expect("valid test secret"),
        );
        let state = web::Data::new(AppState::new(service.clone(), CookieConfig::default()));

        Self {
            state,
            service,
            gate,
            clock,
        }
    }

    pub fn access_token(&self) -> String {
        self.service
            .issue(USER_ID, ACCOUNT, TokenType::Access, "10.0.0.1")
            .unwrap()
    }

    pub fn refresh_token(&self) -> String {
        self.service
            .issue(USER_ID, ACCOUNT, TokenType::Refresh, "10.0.0.1")
            .unwrap()
    }

    pub fn advance_past_access_expiry(&self) {
        let ttl = self.service.config().access_token_ttl_seconds();
        self.clock.advance(Duration::seconds(ttl + 1));
    }
}

mod refresh_tests;
mod service_tests;

use std::sync::Arc;

use crate::repositories::revocation::InMemoryRevocationGate;
use crate::services::clock::ManualClock;
use crate::services::token::{TokenService, TokenServiceConfig};

pub(super) const TEST_SECRET: &str = "dGhpcy1pcy1hLXZlcnktbG9uZy10ZXN0LXNlY3JldC1rZXk=";
pub(super) const OTHER_SECRET: &str = "YW5vdGhlci1zZWNyZXQtdXNlZC1vbmx5LWJ5LXRlc3RzLTQy";
pub(super) const START: i64 = 1_700_000_000;

pub(super) struct Fixture {
    pub service: TokenService,
    pub gate: Arc<InMemoryRevocationGate>,
    pub clock: Arc<ManualClock>,
}

pub(super) fn fixture() -> Fixture {
    fixture_with(TokenServiceConfig::with_secret(TEST_SECRET))
}

pub(super) fn fixture_with(config: TokenServiceConfig) -> Fixture {
    let clock = Arc::new(ManualClock::at_timestamp(START));
    let gate = Arc::new(InMemoryRevocationGate::with_capacity(1000, clock.clone()));
    let service = TokenService::with_clock(config, gate.clone(), clock.clone()).unwrap();
    Fixture { service, gate, clock }
}

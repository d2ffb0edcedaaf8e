use chrono::{Duration, TimeZone, Utc};

use crate::cache::RedisRevocationGate;
use crate::InfrastructureError;
use ag_core::errors::DomainError;

#[test]
fn test_key_layout() {
    assert_eq!(RedisRevocationGate::key("abc"), "revoked:jti:abc");
}

#[test]
fn test_ttl_rounds_up() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    assert_eq!(RedisRevocationGate::ttl_seconds(now, now + Duration::seconds(30)), Some(30));
    assert_eq!(RedisRevocationGate::ttl_seconds(now, now + Duration::milliseconds(1)), Some(1));
    assert_eq!(RedisRevocationGate::ttl_seconds(now, now + Duration::milliseconds(1500)), Some(2));
}

#[test]
fn test_expired_tokens_have_no_ttl() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    assert_eq!(RedisRevocationGate::ttl_seconds(now, now), None);
    assert_eq!(RedisRevocationGate::ttl_seconds(now, now - Duration::seconds(5)), None);
}

#[test]
fn test_infrastructure_error_conversion() {
    let err: DomainError = InfrastructureError::Config("bad url".to_string()).into();
    assert!(matches!(err, DomainError::Configuration { .. }));

    let err: DomainError = InfrastructureError::General("down".to_string()).into();
    assert!(matches!(err, DomainError::Internal { .. }));
}

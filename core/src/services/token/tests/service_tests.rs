//! Unit tests for token issuance and validation

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use super::{fixture, fixture_with, Fixture, OTHER_SECRET, START};
use crate::domain::entities::token::TokenType;
use crate::domain::value_objects::SessionState;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::revocation::{NoopRevocationGate, RevocationGate};
use crate::services::clock::ManualClock;
use crate::services::token::{TokenService, TokenServiceConfig};

const IP: &str = "203.0.113.7";

fn access(f: &Fixture) -> String {
    f.service.issue(42, "alice", TokenType::Access, IP).unwrap()
}

#[test]
fn test_new_without_secret_is_configuration_error() {
    let result = TokenService::new(TokenServiceConfig::default(), Arc::new(NoopRevocationGate));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_new_with_short_secret_is_configuration_error() {
    let config = TokenServiceConfig::with_secret("c2hvcnQ=");
    let result = TokenService::new(config, Arc::new(NoopRevocationGate));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[tokio::test]
async fn test_round_trip_preserves_identity() {
    let f = fixture();
    for token_type in [TokenType::Access, TokenType::Refresh] {
        let token = f.service.issue(42, "alice", token_type, IP).unwrap();
        let claims = f.service.validate(&token).await.unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.account(), "alice");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.token_type, token_type);
        assert_eq!(claims.ip_address, IP);
        assert_eq!(claims.iss, "act2gether");
        assert_eq!(claims.aud, "act2gether-users");
    }
}

#[test]
fn test_timestamps_and_lifetimes() {
    let f = fixture();
    let access = f.service.parse(&access(&f)).unwrap();
    assert_eq!(access.iat, START);
    assert_eq!(access.nbf, access.iat);
    assert_eq!(access.exp, START + 3600);

    let refresh = f
        .service
        .parse(&f.service.issue(42, "alice", TokenType::Refresh, IP).unwrap())
        .unwrap();
    assert_eq!(refresh.exp, START + 604_800);
}

#[test]
fn test_jti_is_unique_url_safe() {
    let f = fixture();
    let a = f.service.parse(&access(&f)).unwrap();
    let b = f.service.parse(&access(&f)).unwrap();
    assert_ne!(a.jti, b.jti);
    assert_eq!(a.jti.len(), 43);
    assert!(a.jti.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert_eq!(URL_SAFE_NO_PAD.decode(&a.jti).unwrap().len(), 32);
}

#[test]
fn test_header_uses_hs512() {
    let f = fixture();
    let header = jsonwebtoken::decode_header(&access(&f)).unwrap();
    assert_eq!(header.alg, Algorithm::HS512);
}

#[tokio::test]
async fn test_expiry_boundary() {
    let f = fixture();
    let token = access(&f);

    f.clock.advance(Duration::seconds(3599)); // exp == now + 1
    assert!(f.service.validate(&token).await.is_ok());

    f.clock.advance(Duration::seconds(1)); // exp == now
    assert!(matches!(
        f.service.validate(&token).await,
        Err(DomainError::Token(TokenError::Expired))
    ));
    assert!(!f.service.is_valid(&token, None).await);
}

#[tokio::test]
async fn test_not_yet_valid() {
    let f = fixture();
    let token = access(&f);
    f.clock.set(Utc.timestamp_opt(START - 10, 0).unwrap());
    assert!(matches!(f.service.parse(&token), Err(DomainError::Token(TokenError::NotYetValid))));
}

#[tokio::test]
async fn test_ip_mismatch_does_not_invalidate() {
    let f = fixture();
    let token = access(&f);
    let claims = f.service.validate_with_ip(&token, Some("198.51.100.1")).await.unwrap();
    assert_eq!(claims.user_id, 42);
    assert!(f.service.is_valid(&token, Some("198.51.100.1")).await);
    assert!(f.service.is_valid(&token, None).await);
}

#[test]
fn test_signature_mismatch() {
    let f = fixture();
    let other = fixture_with(TokenServiceConfig::with_secret(OTHER_SECRET));
    let forged = other.service.issue(1, "mallory", TokenType::Access, IP).unwrap();
    assert!(matches!(
        f.service.parse(&forged),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_tampered_payload_fails_signature() {
    let f = fixture();
    let token = access(&f);
    let parts: Vec<&str> = token.split('.').collect();
    let mut payload: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
    payload["userId"] = serde_json::json!(1);
    let tampered = format!(
        "{}.{}.{}",
        parts[0],
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap()),
        parts[2]
    );
    assert!(matches!(
        f.service.parse(&tampered),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_malformed_tokens() {
    let f = fixture();
    for token in ["", "   ", "abc", "not.a.token", "a.b"] {
        assert!(
            matches!(f.service.parse(token), Err(DomainError::Token(TokenError::Malformed))),
            "expected malformed for {:?}",
            token
        );
    }
}

#[test]
fn test_other_algorithm_is_unsupported() {
    let f = fixture();
    let claims = f.service.parse(&access(&f)).unwrap();
    let key = EncodingKey::from_secret(b"this-is-a-very-long-test-secret-key");
    let hs256 = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();
    assert!(matches!(f.service.parse(&hs256), Err(DomainError::Token(TokenError::Unsupported))));
}

#[test]
fn test_unknown_algorithm_is_unsupported() {
    let f = fixture();
    let token = access(&f);
    let payload = token.split('.').nth(1).unwrap();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let unsigned = format!("{}.{}.", header, payload);
    assert!(matches!(
        f.service.parse(&unsigned),
        Err(DomainError::Token(TokenError::Unsupported))
    ));
}

#[test]
fn test_issuer_and_audience_mismatch() {
    let f = fixture();
    let mut claims = f.service.parse(&access(&f)).unwrap();

    claims.iss = "someone-else".to_string();
    let token = f.service.encode_jwt(&claims).unwrap();
    assert!(matches!(f.service.parse(&token), Err(DomainError::Token(TokenError::IssuerMismatch))));

    claims.iss = "act2gether".to_string();
    claims.aud = "other-app".to_string();
    let token = f.service.encode_jwt(&claims).unwrap();
    assert!(matches!(f.service.parse(&token), Err(DomainError::Token(TokenError::AudienceMismatch))));
}

#[test]
fn test_missing_claims_are_rejected() {
    let f = fixture();
    let claims = f.service.parse(&access(&f)).unwrap();
    let mut json = serde_json::to_value(&claims).unwrap();
    json.as_object_mut().unwrap().remove("userId");
    let key = EncodingKey::from_secret(b"this-is-a-very-long-test-secret-key");
    let token = encode(&Header::new(Algorithm::HS512), &json, &key).unwrap();
    assert!(matches!(
        f.service.parse(&token),
        Err(DomainError::Token(TokenError::Malformed | TokenError::MissingClaim { .. }))
    ));
}

#[tokio::test]
async fn test_revoked_token_is_rejected() {
    let f = fixture();
    let token = access(&f);
    let jti = f.service.jti_from_token(&token).unwrap();

    f.service.revoke_token(&token).await.unwrap();

    assert!(f.gate.is_revoked(&jti).await.unwrap());
    assert!(matches!(
        f.service.validate(&token).await,
        Err(DomainError::Auth(AuthError::TokenRevoked))
    ));
    assert!(!f.service.is_valid(&token, None).await);
    // parse alone does not consult the gate
    assert!(f.service.parse(&token).is_ok());
}

#[tokio::test]
async fn test_revocation_lasts_until_token_expiry() {
    let f = fixture();
    let token = access(&f);
    let jti = f.service.jti_from_token(&token).unwrap();
    f.service.revoke_token(&token).await.unwrap();

    f.clock.advance(Duration::seconds(3599));
    assert!(f.gate.is_revoked(&jti).await.unwrap());

    f.clock.advance(Duration::seconds(1));
    assert!(!f.gate.is_revoked(&jti).await.unwrap());
}

#[tokio::test]
async fn test_revoking_expired_token_is_noop() {
    let f = fixture();
    let token = access(&f);
    f.clock.advance(Duration::hours(2));
    f.service.revoke_token(&token).await.unwrap();
    assert!(f.gate.is_empty().await);
}

#[tokio::test]
async fn test_revoking_garbage_fails() {
    let f = fixture();
    assert!(f.service.revoke_token("garbage").await.is_err());
}

#[tokio::test]
async fn test_session_state() {
    let f = fixture();
    let token = access(&f);

    match f.service.session_state(&token, Some(IP)).await.unwrap() {
        SessionState::ActiveAccess(claims) => assert_eq!(claims.user_id, 42),
        SessionState::NeedsRefresh => panic!("expected active session"),
    }

    f.clock.advance(Duration::hours(1));
    assert_eq!(
        f.service.session_state(&token, Some(IP)).await.unwrap(),
        SessionState::NeedsRefresh
    );
}

#[tokio::test]
async fn test_session_state_rejects_refresh_token() {
    let f = fixture();
    let refresh = f.service.issue(42, "alice", TokenType::Refresh, IP).unwrap();
    assert!(matches!(
        f.service.session_state(&refresh, None).await,
        Err(DomainError::Auth(AuthError::WrongTokenType {
            expected: TokenType::Access,
            actual: TokenType::Refresh
        }))
    ));
}

#[tokio::test]
async fn test_session_state_keeps_signature_errors() {
    let f = fixture();
    let other = fixture_with(TokenServiceConfig::with_secret(OTHER_SECRET));
    let forged = other.service.issue(1, "mallory", TokenType::Access, IP).unwrap();
    assert!(matches!(
        f.service.session_state(&forged, None).await,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_claim_accessors() {
    let f = fixture();
    let token = access(&f);
    assert_eq!(f.service.user_id_from_token(&token).unwrap(), 42);
    assert_eq!(f.service.account_from_token(&token).unwrap(), "alice");
    assert_eq!(f.service.ip_address_from_token(&token).unwrap(), IP);
    assert_eq!(f.service.token_type_from_token(&token).unwrap(), TokenType::Access);
    assert_eq!(
        f.service.expiration_from_token(&token).unwrap().timestamp(),
        START + 3600
    );
    assert!(f.service.user_id_from_token("garbage").is_err());
}

#[test]
fn test_client_ip_is_normalized() {
    let f = fixture();
    let token = f.service.issue(42, "alice", TokenType::Access, " 10.0.0.5 ").unwrap();
    assert_eq!(f.service.ip_address_from_token(&token).unwrap(), "10.0.0.5");

    let token = f.service.issue(42, "alice", TokenType::Access, "<script>").unwrap();
    assert_eq!(f.service.ip_address_from_token(&token).unwrap(), "invalid");
}

struct UnavailableGate;

#[async_trait]
impl RevocationGate for UnavailableGate {
    async fn is_revoked(&self, _jti: &str) -> Result<bool, DomainError> {
        Err(DomainError::Internal {
            message: "store unavailable".to_string(),
        })
    }

    async fn revoke(&self, _jti: &str, _expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::Internal {
            message: "store unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_unavailable_gate_fails_closed() {
    let clock = Arc::new(ManualClock::at_timestamp(START));
    let service = TokenService::with_clock(
        TokenServiceConfig::with_secret(super::TEST_SECRET),
        Arc::new(UnavailableGate),
        clock,
    )
    .unwrap();
    let token = service.issue(42, "alice", TokenType::Access, IP).unwrap();

    assert!(matches!(service.validate(&token).await, Err(DomainError::Internal { .. })));
    assert!(!service.is_valid(&token, None).await);
}

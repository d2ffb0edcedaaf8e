//! Tests for access token renewal and refresh token rotation

use chrono::Duration;

use super::{fixture, fixture_with, START};
use crate::domain::entities::token::TokenType;
use crate::errors::{AuthError, DomainError};
use crate::services::token::TokenServiceConfig;

const IP: &str = "203.0.113.7";

#[tokio::test]
async fn test_refresh_with_access_token_fails() {
    let f = fixture();
    let access = f.service.issue(42, "alice", TokenType::Access, IP).unwrap();
    assert!(matches!(
        f.service.refresh(&access, IP).await,
        Err(DomainError::Auth(AuthError::WrongTokenType {
            expected: TokenType::Refresh,
            actual: TokenType::Access
        }))
    ));
}

#[tokio::test]
async fn test_refresh_issues_access_token() {
    let f = fixture();
    let refresh = f.service.issue(42, "alice", TokenType::Refresh, IP).unwrap();

    f.clock.advance(Duration::hours(2));
    let access = f.service.refresh(&refresh, "198.51.100.9").await.unwrap();
    let claims = f.service.validate(&access).await.unwrap();

    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.user_account, "alice");
    assert_eq!(claims.ip_address, "198.51.100.9");
    assert_eq!(claims.iat, START + 7200);
}

#[tokio::test]
async fn test_refresh_without_rotation_keeps_refresh_token_usable() {
    let f = fixture();
    let refresh = f.service.issue(42, "alice", TokenType::Refresh, IP).unwrap();

    f.service.refresh(&refresh, IP).await.unwrap();
    f.service.refresh(&refresh, IP).await.unwrap();
    assert!(f.service.is_valid(&refresh, None).await);
}

#[tokio::test]
async fn test_refresh_with_invalid_token_is_authentication_failure() {
    let f = fixture();
    assert!(matches!(
        f.service.refresh("garbage", IP).await,
        Err(DomainError::Auth(AuthError::AuthenticationFailed))
    ));
}

#[tokio::test]
async fn test_refresh_with_expired_refresh_token_fails() {
    let f = fixture_with(TokenServiceConfig {
        refresh_token_ttl_ms: 60_000,
        ..TokenServiceConfig::with_secret(super::TEST_SECRET)
    });
    let refresh = f.service.issue(42, "alice", TokenType::Refresh, IP).unwrap();
    f.clock.advance(Duration::seconds(60));
    assert!(matches!(
        f.service.refresh(&refresh, IP).await,
        Err(DomainError::Auth(AuthError::AuthenticationFailed))
    ));
}

#[tokio::test]
async fn test_rotation_revokes_presented_token() {
    let f = fixture();
    let refresh = f.service.issue(42, "alice", TokenType::Refresh, IP).unwrap();

    let pair = f.service.refresh_with_rotation(&refresh, IP).await.unwrap();
    assert_eq!(pair.access_expires_in, 3600);
    assert_eq!(pair.refresh_expires_in, 604_800);

    let access = f.service.validate(&pair.access_token).await.unwrap();
    let new_refresh = f.service.validate(&pair.refresh_token).await.unwrap();
    assert_eq!(access.token_type, TokenType::Access);
    assert_eq!(new_refresh.token_type, TokenType::Refresh);
    assert_eq!(new_refresh.user_id, 42);

    // Replay of the old refresh token
    assert!(matches!(
        f.service.refresh_with_rotation(&refresh, IP).await,
        Err(DomainError::Auth(AuthError::TokenRevoked))
    ));
    assert!(matches!(
        f.service.refresh(&refresh, IP).await,
        Err(DomainError::Auth(AuthError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_rotation_chain() {
    let f = fixture();
    let mut refresh = f.service.issue(7, "bob", TokenType::Refresh, IP).unwrap();
    for _ in 0..3 {
        f.clock.advance(Duration::minutes(30));
        refresh = f.service.refresh_with_rotation(&refresh, IP).await.unwrap().refresh_token;
    }
    assert_eq!(f.gate.len().await, 3);
    assert!(f.service.is_valid(&refresh, None).await);
}

#[tokio::test]
async fn test_blank_account_is_rejected_at_issue() {
    let f = fixture();
    for account in ["", "   "] {
        for token_type in [TokenType::Access, TokenType::Refresh] {
            assert!(matches!(
                f.service.issue(42, account, token_type, IP),
                Err(DomainError::Validation { .. })
            ));
        }
    }
    assert!(f.service.issue_pair(42, "", IP).is_err());
}

#[tokio::test]
async fn test_any_issued_identity_validates_and_refreshes() {
    let f = fixture();
    let identities = [
        (i64::MIN, "홍길동@example.com"),
        (i64::MAX, "zoë.müller"),
        (0, "a"),
        (-1, "用户_42"),
    ];

    for (user_id, account) in identities {
        let pair = f.service.issue_pair(user_id, account, IP).unwrap();

        let claims = f.service.validate(&pair.access_token).await.unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.user_account, account);
        assert_eq!(claims.sub, account);

        let access = f.service.refresh(&pair.refresh_token, IP).await.unwrap();
        assert_eq!(f.service.user_id_from_token(&access).unwrap(), user_id);

        let rotated = f.service.refresh_with_rotation(&pair.refresh_token, IP).await.unwrap();
        let claims = f.service.validate(&rotated.refresh_token).await.unwrap();
        assert_eq!(claims.user_account, account);
    }
}

use actix_web::{web, HttpRequest, HttpResponse};

use ag_core::domain::entities::token::TokenType;

use crate::app::AppState;
use crate::dto::auth::{RefreshResponse, RefreshTokenRequest};
use crate::handlers::error::{handle_domain_error, missing_token_response};
use crate::transport::{client_ip, extract_token, token_cookie};

/// Handler for POST /api/v1/auth/refresh
///
/// Issues a new access token from a valid refresh token. When rotation is
/// enabled the presented refresh token is revoked and a new one is returned.
///
/// The refresh token is read from the JSON body first, then from the
/// Authorization header or the refresh cookie.
///
/// # Request Body (optional)
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 3600
/// }
/// ```
/// `refresh_token` is omitted when rotation is disabled. Both tokens are also set
/// as HTTP-only cookies.
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid, expired, revoked or wrong-type token
/// - 500 Internal Server Error: Revocation store unavailable
pub async fn refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse {
    let token = body
        .and_then(|body| body.into_inner().refresh_token)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| extract_token(&req, &state.cookie, TokenType::Refresh));

    let token = match token {
        Some(token) => token,
        None => return missing_token_response(),
    };

    let service = &state.token_service;
    let ip = client_ip(&req);

    if service.config().rotate_refresh_tokens {
        match service.refresh_with_rotation(&token, &ip).await {
            Ok(pair) => {
                let access_cookie =
                    token_cookie(&state.cookie, TokenType::Access, pair.access_token.clone(), pair.access_expires_in);
                let refresh_cookie =
                    token_cookie(&state.cookie, TokenType::Refresh, pair.refresh_token.clone(), pair.refresh_expires_in);

                HttpResponse::Ok()
                    .cookie(access_cookie)
                    .cookie(refresh_cookie)
                    .json(RefreshResponse::new(pair.access_token, Some(pair.refresh_token), pair.access_expires_in))
            }
            Err(error) => handle_domain_error(&error),
        }
    } else {
        let access_ttl = service.ttl_seconds(TokenType::Access);
        match service.refresh(&token, &ip).await {
            Ok(access_token) => HttpResponse::Ok()
                .cookie(token_cookie(&state.cookie, TokenType::Access, access_token.clone(), access_ttl))
                .json(RefreshResponse::new(access_token, None, access_ttl)),
            Err(error) => handle_domain_error(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dto::auth::{RefreshResponse, RefreshTokenRequest};

    #[test]
    fn test_refresh_request_token_is_optional() {
        let request: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(request.refresh_token.is_none());
    }

    #[test]
    fn test_refresh_response_omits_missing_refresh_token() {
        let json = serde_json::to_value(RefreshResponse::new("a".to_string(), None, 3600)).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 3600);
        assert!(json.get("refresh_token").is_none());
    }
}

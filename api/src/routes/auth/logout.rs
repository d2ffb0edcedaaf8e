use actix_web::{web, HttpRequest, HttpResponse};

use ag_core::domain::entities::token::TokenType;

use crate::app::AppState;
use crate::dto::auth::{LogoutRequest, LogoutResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;
use crate::transport::{clear_token_cookies, cookie_token, extract_token};

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented access token and, when one is supplied in the body or
/// the refresh cookie, the caller's refresh token. Both cookies are cleared.
/// Requires authentication via the access token.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 500 Internal Server Error: Token revocation failure
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    body: Option<web::Json<LogoutRequest>>,
) -> HttpResponse {
    let service = &state.token_service;

    if let Some(access_token) = extract_token(&req, &state.cookie, TokenType::Access) {
        if let Err(error) = service.revoke_token(&access_token).await {
            return handle_domain_error(&error);
        }
    }

    let refresh_token = body
        .and_then(|body| body.into_inner().refresh_token)
        .filter(|token| !token.trim().is_empty())
        .or_else(|| cookie_token(&req, &state.cookie, TokenType::Refresh));

    if let Some(refresh_token) = refresh_token {
        match service.parse(&refresh_token) {
            Ok(claims) if claims.token_type == TokenType::Refresh && claims.user_id == auth.user_id => {
                if let Err(error) = service.revoke_token(&refresh_token).await {
                    return handle_domain_error(&error);
                }
            }
            Ok(_) => log::warn!("Ignoring refresh token of another user or type on logout"),
            // Expired or unreadable: nothing left to revoke
            Err(error) => log::debug!("Refresh token not revoked on logout: {}", error),
        }
    }

    log::info!("User {} logged out", auth.user_id);

    let mut response = HttpResponse::Ok();
    clear_token_cookies(&mut response, &state.cookie);
    response.json(LogoutResponse {
        message: String::from("Logged out successfully"),
    })
}

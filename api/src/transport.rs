//! Token transport over HTTP
//!
//! Tokens travel in the `Authorization: Bearer` header or in HTTP-only cookies.
//! The header always wins when both are present.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponseBuilder};

use ag_core::domain::entities::token::TokenType;
use ag_shared::config::CookieConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// Client address used for token binding, `"unknown"` when the peer is not known
///
/// Only the socket peer is trusted; forwarding headers are ignored.
pub fn client_ip(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| String::from("unknown"))
}

/// Non-empty token after `Bearer ` in the Authorization header
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Non-empty value of the cookie carrying tokens of `token_type`
pub fn cookie_token(req: &HttpRequest, config: &CookieConfig, token_type: TokenType) -> Option<String> {
    req.cookie(cookie_name(config, token_type))
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Bearer header first, then the cookie for `token_type`
pub fn extract_token(req: &HttpRequest, config: &CookieConfig, token_type: TokenType) -> Option<String> {
    bearer_token(req).or_else(|| cookie_token(req, config, token_type))
}

pub fn cookie_name(config: &CookieConfig, token_type: TokenType) -> &str {
    match token_type {
        TokenType::Access => config.access_cookie_name.as_str(),
        TokenType::Refresh => config.refresh_cookie_name.as_str(),
    }
}

/// HTTP-only, SameSite=Strict cookie that lives as long as the token
pub fn token_cookie(
    config: &CookieConfig,
    token_type: TokenType,
    token: impl Into<String>,
    ttl_seconds: i64,
) -> Cookie<'static> {
    base_cookie(config, token_type, token.into())
        .max_age(Duration::seconds(ttl_seconds.max(0)))
        .finish()
}

/// Empty cookie with `Max-Age=0`, telling the browser to drop it
pub fn clear_token_cookie(config: &CookieConfig, token_type: TokenType) -> Cookie<'static> {
    base_cookie(config, token_type, String::new())
        .max_age(Duration::ZERO)
        .finish()
}

/// Adds clearing cookies for both token types to a response
pub fn clear_token_cookies(response: &mut HttpResponseBuilder, config: &CookieConfig) {
    response.cookie(clear_token_cookie(config, TokenType::Access));
    response.cookie(clear_token_cookie(config, TokenType::Refresh));
}

fn base_cookie(
    config: &CookieConfig,
    token_type: TokenType,
    value: String,
) -> actix_web::cookie::CookieBuilder<'static> {
    Cookie::build(cookie_name(config, token_type).to_string(), value)
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
}

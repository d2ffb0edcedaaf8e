//! Domain error to HTTP response mapping
//!
//! Bodies carry a stable code and a generic message; the full error only goes to
//! the server log.

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use ag_core::errors::{AuthError, DomainError};
use ag_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Auth(AuthError::InsufficientPermissions) => StatusCode::FORBIDDEN,
        DomainError::Token(_) | DomainError::Auth(_) => StatusCode::UNAUTHORIZED,
        DomainError::Security(_) | DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Configuration { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        log::error!("Request failed: {}", error);
    } else {
        log::warn!("Request rejected: {}", error);
    }

    HttpResponse::build(status).json(error.to_error_response())
}

/// 401 telling the client its access token expired and `/auth/refresh` applies
pub fn session_expired_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        error_codes::TOKEN_EXPIRED,
        "Session expired",
    ))
}

/// 401 for requests that carry no token at all
pub fn missing_token_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        error_codes::UNAUTHORIZED,
        "Authentication required",
    ))
}

/// Wraps a ready response as an actix error, for middleware and extractors
pub fn response_to_actix(label: &'static str, response: HttpResponse) -> actix_web::Error {
    InternalError::from_response(label, response).into()
}

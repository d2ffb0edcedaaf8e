//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware takes the access token from the Authorization header or the
//! access cookie, validates it through the core `TokenService` (revocation
//! included) and injects an [`AuthContext`] into the request. An expired access
//! token gets a `TOKEN_EXPIRED` 401 so clients know to call `/auth/refresh`.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;

use ag_core::domain::entities::token::{Claims, TokenType};
use ag_core::domain::value_objects::SessionState;

use crate::app::AppState;
use crate::handlers::error::{
    handle_domain_error, missing_token_response, response_to_actix, session_expired_response,
};
use crate::transport::{client_ip, extract_token};

/// Authenticated caller, injected into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub account: String,
    pub token_type: TokenType,
    /// Token identifier, used to revoke the presented token
    pub jti: String,
    /// Address the token was issued to
    pub ip_address: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            account: claims.user_account,
            token_type: claims.token_type,
            jti: claims.jti,
            ip_address: claims.ip_address,
        }
    }
}

/// JWT authentication middleware factory
///
/// Requires `web::Data<AppState>` in the application data.
#[derive(Debug, Default, Clone, Copy)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = match req.app_data::<web::Data<AppState>>() {
                Some(state) => state.clone(),
                None => {
                    log::error!("JwtAuth used without AppState in application data");
                    return Ok(reject(req, HttpResponse::InternalServerError().finish()));
                }
            };

            let token = match extract_token(req.request(), &state.cookie, TokenType::Access) {
                Some(token) => token,
                None => return Ok(reject(req, missing_token_response())),
            };
            let ip = client_ip(req.request());

            match state.token_service.session_state(&token, Some(&ip)).await {
                Ok(SessionState::ActiveAccess(claims)) => {
                    req.extensions_mut().insert(AuthContext::from(claims));
                }
                Ok(SessionState::NeedsRefresh) => {
                    log::debug!("Access token expired, client must refresh");
                    return Ok(reject(req, session_expired_response()));
                }
                Err(e) => return Ok(reject(req, handle_domain_error(&e))),
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Short-circuits the request with `response`
fn reject<B>(req: ServiceRequest, response: HttpResponse) -> ServiceResponse<EitherBody<B>> {
    req.into_response(response).map_into_right_body()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| response_to_actix("missing auth context", missing_token_response()));

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::Session;
use crate::auth::token::TokenAuthority;
use crate::auth::REFRESH_COOKIE;
use crate::error::AppError;

/// Runs the credential renewal protocol on every request it wraps.
///
/// The access credential arrives as a bearer header, the refresh credential
/// as the `REFRESH_TOKEN` cookie. On success a `Session` (claims plus the
/// renewed access credential, if one was minted) lands in request
/// extensions. Any verification failure ends the request with 401 before
/// the handler runs.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authority = match req.app_data::<web::Data<TokenAuthority>>() {
            Some(authority) => authority.clone(),
            None => {
                let err = AppError::InternalServerError("Token authority not configured".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let access_token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|value| value.to_string());

        let refresh_token = req
            .cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string());

        let (refresh_token, access_token) = match (refresh_token, access_token) {
            (Some(refresh), Some(access)) => (refresh, access),
            _ => {
                let err = AppError::Unauthorized("Missing credentials".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        match authority.verify(&refresh_token, &access_token) {
            Ok((claims, renewed)) => {
                req.extensions_mut().insert(Session { claims, renewed });
                Box::pin(self.service.call(req))
            }
            Err(token_err) => {
                let err = AppError::from(token_err);
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}

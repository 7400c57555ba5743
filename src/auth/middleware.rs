use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::VerifiedIdentity;
use crate::auth::token::TokenService;
use crate::auth::UNAUTHORIZED;
use crate::error::AppError;

/// Why a request was turned away. Logged, never shown to the client.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum Rejection {
    #[error("no Authorization header")]
    MissingHeader,
    #[error("Authorization header is not `<scheme> <token>`")]
    MalformedHeader,
    #[error("Authorization scheme is not Bearer")]
    WrongScheme,
    #[error("bearer token failed verification")]
    InvalidToken,
}

/// Pulls the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, Rejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Rejection::MissingHeader)?
        .to_str()
        .map_err(|_| Rejection::MalformedHeader)?;

    let mut fields = value.split_whitespace();
    let (Some(scheme), Some(token), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(Rejection::MalformedHeader);
    };
    if scheme != "Bearer" {
        return Err(Rejection::WrongScheme);
    }
    Ok(token)
}

fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<VerifiedIdentity, Rejection> {
    let token = bearer_token(headers)?;
    let payload = tokens
        .verify_token(token)
        .map_err(|_| Rejection::InvalidToken)?;
    Ok(payload.into())
}

/// Gatekeeper for privileged routes.
///
/// Requests without a valid bearer token get a 401 and never reach the
/// wrapped service. Accepted requests carry a [`VerifiedIdentity`] in their
/// extensions. The body is never read.
#[derive(Clone)]
pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(req.headers(), &self.tokens) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), rejection);
                let response = AppError::Unauthorized(UNAUTHORIZED.into()).error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::TokenPayload;
use crate::auth::UNAUTHORIZED;
use crate::error::AppError;

/// The caller's identity, as proven by a verified bearer token.
///
/// `AuthMiddleware` stores one of these in the request extensions; handlers
/// take it as an argument. On a route the middleware does not cover, the
/// extractor fails with `AppError::Unauthorized` rather than letting the
/// handler run anonymously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: i32,
    pub username: String,
}

impl From<TokenPayload> for VerifiedIdentity {
    fn from(payload: TokenPayload) -> Self {
        Self {
            user_id: payload.user_id,
            username: payload.username,
        }
    }
}

impl FromRequest for VerifiedIdentity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<VerifiedIdentity>().cloned() {
            Some(identity) => ready(Ok(identity)),
            None => {
                log::error!(
                    "no verified identity on {}; is AuthMiddleware applied?",
                    req.path()
                );
                ready(Err(AppError::Unauthorized(UNAUTHORIZED.into()).into()))
            }
        }
    }
}

//! Application assembly shared by the binary and the integration tests.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, Error};
use chrono::Duration;

use crate::auth::TokenService;
use crate::error::AppError;
use crate::routes::{self, health};
use crate::storage::{TodoStore, UserStore};

/// Everything a handler may need, constructed once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: Arc<TokenService>,
    /// Lifetime of tokens issued at login.
    pub token_ttl: Duration,
}

impl AppState {
    pub fn new<S>(storage: Arc<S>, tokens: Arc<TokenService>, token_ttl: Duration) -> Self
    where
        S: UserStore + TodoStore + 'static,
    {
        Self {
            users: storage.clone(),
            todos: storage,
            tokens,
            token_ttl,
        }
    }
}

/// Builds the full application: public routes, the authenticated `/todo`
/// scope, CORS, request logging and JSON error rendering for bad input.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let tokens = state.tokens.clone();

    App::new()
        .app_data(web::Data::new(state))
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .service(health::hello)
        .service(health::health)
        .service(health::ping)
        .configure(|cfg| routes::config(cfg, tokens))
}

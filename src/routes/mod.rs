pub mod auth;
pub mod health;
pub mod todos;

use std::sync::Arc;

use actix_web::web;

use crate::auth::{AuthMiddleware, TokenService};

/// Registers `/user` (public) and `/todo` (bearer token required).
pub fn config(cfg: &mut web::ServiceConfig, tokens: Arc<TokenService>) {
    cfg.service(
        web::scope("/user")
            .service(auth::register)
            .service(auth::login),
    )
    .service(
        web::scope("/todo")
            .wrap(AuthMiddleware::new(tokens))
            .service(todos::list_todos)
            .service(todos::create_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo)
            .service(todos::get_todo),
    );
}

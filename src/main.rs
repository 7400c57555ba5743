use std::io;
use std::sync::Arc;

use actix_web::HttpServer;
use todoforge::{auth::TokenService, build_app, config::Config, storage::PgStorage, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;

    // A bad key must stop the process before it binds a port.
    let tokens = Arc::new(TokenService::new(config.auth_key.as_bytes()).map_err(startup_error)?);

    let storage = PgStorage::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(startup_error)?;
    storage.migrate().await.map_err(startup_error)?;

    let state = AppState::new(Arc::new(storage), tokens, config.token_ttl);

    log::info!("Starting todoforge server at {}", config.server_url());
    HttpServer::new(move || build_app(state.clone()))
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await
}

fn startup_error<E: std::fmt::Display>(error: E) -> io::Error {
    log::error!("startup failed: {}", error);
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

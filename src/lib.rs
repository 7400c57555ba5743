#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "A multi-tenant to-do backend. Users register, log in for an encrypted"]
#![doc = "bearer token, and manage their own items. The `auth` module holds the"]
#![doc = "security core: password hashing, token issue/verify, the request"]
#![doc = "middleware and the per-handler ownership guard. Storage is behind traits."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;

pub use app::{build_app, AppState};
pub use error::AppError;

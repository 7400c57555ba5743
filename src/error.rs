//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type handlers return.
//! It implements `actix_web::error::ResponseError` so every failure renders as
//! a JSON body of the form `{"error": "..."}` with the matching status code.
//!
//! `From` conversions exist for the errors the lower layers produce (`sqlx`,
//! `validator`, token and hashing failures, configuration problems), so the
//! `?` operator works throughout the request path.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::password::HashingError;
use crate::auth::token::TokenError;
use crate::config::ConfigError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication or ownership failure (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed or otherwise unacceptable request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The requested resource does not exist for this caller (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Failure inside the storage layer (HTTP 500).
    /// The detail is logged but never sent to the client.
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input failed `validator` rules (HTTP 422).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Startup configuration is unusable. Fatal before serving; 500 if it ever
    /// reaches a request.
    #[error("Configuration Error: {0}")]
    Configuration(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_)
            | AppError::DatabaseError(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::InternalServerError(msg) => msg.as_str(),
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                "Database error"
            }
            AppError::Configuration(msg) => {
                log::error!("configuration error surfaced in a request: {}", msg);
                "Internal server error"
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// `RowNotFound` becomes a 404; everything else is a storage failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// A bad key is a configuration problem; every verification failure collapses
/// into the same unauthorized outcome.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::InvalidKeySize { .. } => AppError::Configuration(error.to_string()),
            TokenError::InvalidToken => AppError::Unauthorized(crate::auth::UNAUTHORIZED.into()),
            TokenError::InvalidDuration | TokenError::Encryption | TokenError::Encoding(_) => {
                AppError::InternalServerError("Failed to issue token".into())
            }
        }
    }
}

impl From<HashingError> for AppError {
    fn from(error: HashingError) -> AppError {
        log::error!("{}", error);
        AppError::InternalServerError("Failed to hash password".into())
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> AppError {
        AppError::Configuration(error.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Resource not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::ValidationError("title: length".into());
        assert_eq!(error.error_response().status(), 422);

        let error = AppError::InternalServerError("Server error".into());
        assert_eq!(error.error_response().status(), 500);

        let error = AppError::Configuration("AUTH_KEY must be set".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[actix_web::test]
    async fn test_database_error_detail_is_hidden() {
        let error = AppError::DatabaseError("relation \"todos\" does not exist".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Database error");
    }

    #[test]
    fn test_token_errors_map_to_status() {
        let error: AppError = TokenError::InvalidToken.into();
        assert!(matches!(error, AppError::Unauthorized(_)));

        let error: AppError = TokenError::InvalidKeySize {
            expected: 32,
            actual: 5,
        }
        .into();
        assert!(matches!(error, AppError::Configuration(_)));
    }

    #[test]
    fn test_row_not_found_is_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}

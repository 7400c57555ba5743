use crate::{
    app::AppState,
    auth::{
        hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest,
        RegisterResponse,
    },
    error::AppError,
    models::NewUser,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

/// Register a new user
///
/// Creates the account. A token is only handed out by `login`.
///
/// ## Responses:
/// - `201 Created`: `{user_id, username, email}`.
/// - `400 Bad Request`: the email is already registered, or the body is not valid JSON.
/// - `422 Unprocessable Entity`: a field failed validation.
#[post("")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = register_data.into_inner();

    if state.users.find_credential_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = web::block(move || hash_password(&password)).await??;

    let user = state
        .users
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;
    log::info!("registered user {}", user.user_id);

    Ok(HttpResponse::Created().json(RegisterResponse {
        user_id: user.user_id,
        username: user.username,
        email: user.email,
    }))
}

/// Login user
///
/// Checks the password and issues a bearer token valid for the configured TTL.
/// An unknown email and a wrong password produce the same 401.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { email, password } = login_data.into_inner();

    let Some(credential) = state.users.find_credential_by_email(&email).await? else {
        log::debug!("login attempt for unknown email");
        return Err(invalid_credentials());
    };

    let password_hash = credential.password_hash.clone();
    let matches = web::block(move || verify_password(&password, &password_hash)).await?;
    if !matches {
        log::debug!("wrong password for user {}", credential.user_id);
        return Err(invalid_credentials());
    }

    let token = state
        .tokens
        .issue_token(credential.user_id, &credential.username, state.token_ttl)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: credential.user_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::MemoryStorage;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;
    use serde_json::json;
    use std::sync::Arc;

    fn state() -> AppState {
        let tokens = TokenService::new(b"0123456789abcdef0123456789abcdef").unwrap();
        AppState::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(tokens),
            Duration::hours(48),
        )
    }

    #[actix_rt::test]
    async fn test_register_validation() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .service(web::scope("/user").service(register)),
        )
        .await;

        // Test invalid email
        let req = test::TestRequest::post()
            .uri("/user")
            .set_json(json!({
                "username": "test",
                "email": "invalid-email",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // Test short password
        let req = test::TestRequest::post()
            .uri("/user")
            .set_json(json!({
                "username": "test",
                "email": "test@example.com",
                "password": "short"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_rt::test]
    async fn test_login_validation() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .service(web::scope("/user").service(login)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({
                "email": "invalid-email",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_rt::test]
    async fn test_login_unknown_email() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .service(web::scope("/user").service(login)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({
                "email": "nobody@example.com",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

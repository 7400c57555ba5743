#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use chrono::Duration;
use serde_json::json;
use todoforge::auth::{AuthResponse, RegisterResponse, TokenService};
use todoforge::storage::MemoryStorage;
use todoforge::AppState;

pub const TEST_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

pub struct TestContext {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
    pub tokens: Arc<TokenService>,
}

pub fn context() -> TestContext {
    let storage = Arc::new(MemoryStorage::new());
    let tokens = Arc::new(TokenService::new(TEST_KEY).expect("test key has the right size"));
    let state = AppState::new(storage.clone(), tokens.clone(), Duration::hours(48));
    TestContext {
        state,
        storage,
        tokens,
    }
}

// Helper struct to hold auth details
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub async fn register_and_login_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    username: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req_register = test::TestRequest::post()
        .uri("/user")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp_register = test::call_service(app, req_register).await;
    let status = resp_register.status();
    let body = test::read_body(resp_register).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let registered: RegisterResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;

    let req_login = test::TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp_login = test::call_service(app, req_login).await;
    let status = resp_login.status();
    let body = test::read_body(resp_login).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to log in. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let auth: AuthResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse login response: {}", e))?;

    if auth.user_id != registered.user_id {
        return Err(format!(
            "login returned user {} but registration created {}",
            auth.user_id, registered.user_id
        ));
    }

    Ok(TestUser {
        id: auth.user_id,
        token: auth.token,
    })
}

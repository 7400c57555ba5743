use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

fn detect_hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}

/// Greeting with the server time and the host serving the request.
#[get("/")]
pub async fn hello() -> impl Responder {
    HttpResponse::Ok().body(format!(
        "Hello from todoforge. Time: {}. Host: {}.\n",
        Utc::now().to_rfc3339(),
        detect_hostname()
    ))
}

/// Liveness probe: a plain `ok`.
#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(actix_web::App::new().service(health)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_hello_names_time_and_host() {
        let app = test::init_service(actix_web::App::new().service(hello)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("Hello from todoforge. Time: "));
        assert!(text.contains(&format!("Host: {}.", detect_hostname())));
    }

    #[actix_web::test]
    async fn test_ping_endpoint() {
        let app = test::init_service(actix_web::App::new().service(ping)).await;

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(test::read_body(resp).await, "ok");
    }
}

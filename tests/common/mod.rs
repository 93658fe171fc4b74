#![allow(dead_code)]

use actix_web::{test::TestRequest, web};
use serde_json::json;
use todo_server::{AppState, Settings};

/// Fresh state over its own in-memory database.
pub async fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let state = AppState::new(config).await.expect("Failed to build app state");
    web::Data::new(state)
}

pub fn register_request(username: &str, email: &str, password: &str) -> TestRequest {
    TestRequest::post().uri("/api/auth/register").set_json(json!({
        "username": username,
        "email": email,
        "password": password
    }))
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post().uri("/api/auth/login").set_json(json!({
        "username": username,
        "password": password
    }))
}

pub fn bearer(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
}

/// Build the full router over a fresh in-memory database.
macro_rules! init_app {
    () => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(common::test_state().await)
                .configure(todo_server::configure),
        )
        .await
    };
}

/// Register an account and log in, yielding the bearer token.
macro_rules! signup {
    ($app:expr, $username:expr) => {{
        let email = format!("{}@example.com", $username);
        let resp = actix_web::test::call_service(
            &$app,
            common::register_request($username, &email, "password123").to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = actix_web::test::call_and_read_body_json(
            &$app,
            common::login_request($username, "password123").to_request(),
        )
        .await;
        body["token"].as_str().expect("login returned no token").to_string()
    }};
}

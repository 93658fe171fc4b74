use actix_web::test;
use serde_json::json;

#[macro_use]
mod common;

use common::{bearer, login_request, register_request};

#[actix_web::test]
async fn test_register_and_login() {
    let app = init_app!();

    let resp = test::call_service(&app, register_request("alice", "a@x.com", "pw123").to_request()).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    let resp = test::call_service(&app, login_request("alice", "pw123").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"]["id"].is_i64());
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn test_duplicate_username_is_rejected() {
    let app = init_app!();

    let resp = test::call_service(&app, register_request("alice", "a@x.com", "pw123").to_request()).await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(&app, register_request("alice", "other@x.com", "pw456").to_request()).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "username already exists");

    // The first account still works with its original password.
    let resp = test::call_service(&app, login_request("alice", "pw123").to_request()).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_duplicate_email_is_rejected() {
    let app = init_app!();

    test::call_service(&app, register_request("alice", "a@x.com", "pw123").to_request()).await;
    let resp = test::call_service(&app, register_request("bob", "a@x.com", "pw456").to_request()).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_invalid_login() {
    let app = init_app!();
    test::call_service(&app, register_request("alice", "a@x.com", "pw123").to_request()).await;

    for (username, password) in [("alice", "wrongpassword"), ("nonexistent", "pw123")] {
        let resp = test::call_service(&app, login_request(username, password).to_request()).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid credentials");
    }
}

#[actix_web::test]
async fn test_invalid_registration() {
    let app = init_app!();

    let resp = test::call_service(&app, register_request("alice", "a@x.com", "").to_request()).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "alice", "password": "pw123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_me() {
    let app = init_app!();
    let token = signup!(app, "alice");

    let resp = test::call_service(&app, bearer(test::TestRequest::get().uri("/api/auth/me"), &token).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn test_me_requires_token() {
    let app = init_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/auth/me").to_request()).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "missing token");
}

#[actix_web::test]
async fn test_verification_failures_collapse_to_invalid_token() {
    let app = init_app!();

    let forged = {
        use jsonwebtoken::{encode, EncodingKey, Header};
        let claims = json!({ "sub": "1", "iat": 0, "exp": 4_102_444_800i64 });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"not_the_secret")).unwrap()
    };

    let headers = [
        "Bearer garbage".to_string(),
        format!("Bearer {}", forged),
        "Token abc".to_string(),
    ];
    for header in headers {
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid token");
    }
}

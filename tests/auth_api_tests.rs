//! Login and session integration tests

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};

use common::{TEST_PASSWORD, TEST_SECRET, TestEnv, bearer};
use geotracker::api::jwt::JwtService;

#[actix_rt::test]
async fn test_login_success_returns_token_and_user() {
    let env = TestEnv::new().await;
    let user = env.create_user("test@example.com").await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let req = TestRequest::post()
        .uri("/api/login")
        .set_json(json!({"email": "test@example.com", "password": TEST_PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user.id);
    assert_eq!(body["user"]["email"], "test@example.com");

    let token = body["token"].as_str().expect("token");
    let claims = JwtService::new(TEST_SECRET, 24)
        .validate_token(token)
        .expect("token should validate");
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
}

#[actix_rt::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let env = TestEnv::new().await;
    env.create_user("test@example.com").await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    for (email, password) in [
        ("test@example.com", "wrong-password"),
        ("nobody@example.com", TEST_PASSWORD),
    ] {
        let req = TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid credentials"}));
    }
}

#[actix_rt::test]
async fn test_login_malformed_body_is_bad_request() {
    let env = TestEnv::new().await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let req = TestRequest::post()
        .uri("/api/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid request");
}

#[actix_rt::test]
async fn test_user_info_returns_claims() {
    let env = TestEnv::new().await;
    let user = env.create_user("info@example.com").await;
    let token = env.token_for(&user);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let req = TestRequest::get()
        .uri("/api/user-info")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["userId"], user.id);
    assert_eq!(body["user"]["email"], "info@example.com");
    assert!(body["user"]["iat"].is_i64());
    assert!(body["user"]["exp"].is_i64());
}

#[actix_rt::test]
async fn test_user_info_without_token() {
    let env = TestEnv::new().await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let req = TestRequest::get().uri("/api/user-info").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "No token provided"}));
}

#[actix_rt::test]
async fn test_user_info_rejects_bad_tokens() {
    let env = TestEnv::new().await;
    let user = env.create_user("bad@example.com").await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let foreign = JwtService::new("some-other-secret", 24)
        .generate_token(user.id, &user.email)
        .expect("sign");

    for header in [
        "Bearer not-a-jwt".to_string(),
        format!("Bearer {}", foreign),
        format!("Basic {}", env.token_for(&user)),
    ] {
        let req = TestRequest::get()
            .uri("/api/user-info")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid token"}));
    }
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let env = TestEnv::new().await;
    let user = env.create_user("old@example.com").await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let now = chrono::Utc::now().timestamp();
    let claims = geotracker::api::jwt::SessionClaims {
        user_id: user.id,
        email: user.email.clone(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("sign");

    let req = TestRequest::get()
        .uri("/api/user-info")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_health_endpoints_need_no_token() {
    let env = TestEnv::new().await;
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["backend"], "sqlite");

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

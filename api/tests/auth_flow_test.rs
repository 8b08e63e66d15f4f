//! Integration tests for registration, email verification and the token lifecycle

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use sefr_api::create_app;
use sefr_shared::{AppConfig, Environment};
use serde_json::json;

use common::{bearer, post_json, register_body, send, verified_account, TestContext, CODE, PASSWORD};

#[actix_web::test]
async fn test_register_returns_tokens_and_pending_verification() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert_eq!(body["user"]["username"], "sara");
    assert_eq!(body["user"]["is_email_verified"], false);
    assert_eq!(body["verification"]["email_status"], "skipped (dev mode)");
    assert_eq!(body["verification"]["email_sent_to"], "sara@example.com");
    assert_eq!(body["verification"]["expires_in_hours"], 1);
    assert_eq!(body["verification"]["is_verified"], false);
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn test_register_sends_mail_when_delivery_enabled() {
    let mut config = AppConfig::testing();
    config.mail.delivery_enabled = true;
    let ctx = TestContext::with(config, CODE);
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["verification"]["email_status"], "sent");
    let mail = ctx.mailer.last_to("sara@example.com").expect("verification mail");
    assert!(mail.text_body.contains(CODE));
}

#[actix_web::test]
async fn test_register_rejects_duplicates_and_weak_input() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let (status, _) = send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", Some("sara"))).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", Some("other"))).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "user_already_exists");
    assert_eq!(body["details"]["field"], "email");

    let (status, body) = send(
        &app,
        post_json("/api/auth/register/", &register_body("new@example.com", Some("sara"))).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["field"], "username");

    let mut weak = register_body("weak@example.com", None);
    weak["password"] = json!("12345678");
    let (status, body) = send(&app, post_json("/api/auth/register/", &weak).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "password_entirely_numeric");

    let (status, body) = send(
        &app,
        post_json("/api/auth/register/", &register_body("not-an-email", None)).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_verify_email_wrong_code_then_success_then_already_verified() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/verify-email/",
            &json!({ "email": "sara@example.com", "code": "000000" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_code");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/verify-email/",
            &json!({ "email": "sara@example.com", "code": CODE }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "success");
    assert!(body["access"].is_string());
    assert_eq!(body["user"]["is_email_verified"], true);

    // Any code is accepted once verified, and no tokens are issued
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/verify-email/",
            &json!({ "email": "sara@example.com", "code": "999999" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "already_verified");
    assert!(body.get("access").is_none());
}

#[actix_web::test]
async fn test_verify_email_unknown_account_is_not_found() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/verify-email/",
            &json!({ "email": "ghost@example.com", "code": CODE }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "user_not_found");
}

#[actix_web::test]
async fn test_code_expires_after_timeout() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;
    ctx.clock.advance(Duration::seconds(3601));

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/verify-email/",
            &json!({ "email": "sara@example.com", "code": CODE }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_code");
}

#[actix_web::test]
async fn test_resend_replaces_pending_code() {
    let ctx = TestContext::with(AppConfig::testing(), "111111222222");
    let app = test::init_service(create_app(ctx.state.clone())).await;

    send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/resend-verification/",
            &json!({ "email": "sara@example.com" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "success");
    assert_eq!(body["verification"]["email_status"], "skipped (dev mode)");
    assert_eq!(body["verification"]["email_sent_to"], "sara@example.com");

    let verify = |code: &str| {
        post_json(
            "/api/auth/verify-email/",
            &json!({ "email": "sara@example.com", "code": code }),
        )
        .to_request()
    };

    let (status, _) = send(&app, verify("111111")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, verify("222222")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "success");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/resend-verification/",
            &json!({ "email": "sara@example.com" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "already_verified");
    assert!(body.get("verification").is_none());
}

#[actix_web::test]
async fn test_login_by_email_or_username() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    verified_account(&app, "sara@example.com", "sara").await;

    for login in ["sara@example.com", "sara"] {
        let (status, body) = send(
            &app,
            post_json("/api/auth/login/", &json!({ "login": login, "password": PASSWORD })).to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login with {}", login);
        assert!(body["access"].is_string());
        assert_eq!(body["access_expires_in"], 900);
    }

    let (status, body) = send(
        &app,
        post_json("/api/auth/login/", &json!({ "login": "sara", "password": "wrong-password" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credentials");
}

#[actix_web::test]
async fn test_refresh_and_logout() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (access, refresh) = verified_account(&app, "sara@example.com", "sara").await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/token/refresh/", &json!({ "refresh": refresh })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());

    // Logout requires an access token
    let (status, body) = send(
        &app,
        post_json("/api/auth/logout/", &json!({ "refresh": refresh })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "missing_token");

    let (status, _) = send(
        &app,
        post_json("/api/auth/logout/", &json!({ "refresh": refresh }))
            .insert_header(bearer(&access))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_json("/api/auth/token/refresh/", &json!({ "refresh": refresh })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_refresh_token");
}

#[actix_web::test]
async fn test_logout_rejects_foreign_refresh_token() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (sara_access, _) = verified_account(&app, "sara@example.com", "sara").await;
    let (_, reza_refresh) = verified_account(&app, "reza@example.com", "reza").await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/logout/", &json!({ "refresh": reza_refresh }))
            .insert_header(bearer(&sara_access))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_refresh_token");
}

#[actix_web::test]
async fn test_expired_access_token_is_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (access, _) = verified_account(&app, "sara@example.com", "sara").await;

    ctx.clock.advance(Duration::minutes(16));

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me/")
            .insert_header(bearer(&access))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_expired");
}

#[actix_web::test]
async fn test_debug_code_lookup_in_development() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/debug/get-code/", &json!({ "email": "sara@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], CODE);
    assert_eq!(body["warning"], "DO NOT USE IN PRODUCTION");
    assert!(body["expires_at"].is_string());
}

#[actix_web::test]
async fn test_debug_code_lookup_forbidden_outside_development() {
    let mut config = AppConfig::testing();
    config.environment = Environment::Staging;
    let ctx = TestContext::with(config, CODE);
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/debug/get-code/", &json!({ "email": "sara@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "debug_only");
}

#[actix_web::test]
async fn test_direct_verify_in_development() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    send(
        &app,
        post_json("/api/auth/register/", &register_body("sara@example.com", None)).to_request(),
    )
    .await;

    let (status, _) = send(&app, post_json("/api/auth/debug/direct-verify/", &json!({})).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json("/api/auth/debug/direct-verify/", &json!({ "email": "ghost@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);

    let (status, body) = send(
        &app,
        post_json("/api/auth/debug/direct-verify/", &json!({ "email": "sara@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert_eq!(body["user"]["is_email_verified"], true);

    let (status, body) = send(
        &app,
        post_json("/api/auth/verify-email/", &json!({ "email": "sara@example.com", "code": CODE }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "already_verified");

    let (status, body) = send(
        &app,
        post_json("/api/auth/debug/direct-verify/", &json!({ "email": "sara@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_verified"], true);
    assert!(body.get("access").is_none());

    let mut config = AppConfig::testing();
    config.environment = Environment::Staging;
    let staging = TestContext::with(config, CODE);
    let app = test::init_service(create_app(staging.state.clone())).await;
    let (status, body) = send(
        &app,
        post_json("/api/auth/debug/direct-verify/", &json!({ "email": "sara@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "debug_only");
}

#[actix_web::test]
async fn test_error_messages_follow_accept_language() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let body = json!({ "login": "ghost", "password": PASSWORD });

    let (_, english) = send(&app, post_json("/api/auth/login/", &body).to_request()).await;
    let (status, persian) = send(
        &app,
        post_json("/api/auth/login/", &body)
            .insert_header(("Accept-Language", "fa-IR,fa;q=0.9"))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(english["code"], persian["code"]);
    assert_ne!(english["message"], persian["message"]);
    assert!(persian["timestamp"].is_string());
}

#[actix_web::test]
async fn test_malformed_body_is_a_validation_error() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["code"], "invalid_request");
}
